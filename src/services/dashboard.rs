//! Account and contract overview shown when a session starts.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::contracts::{ContractFactory, NativeTokenContract},
    types::{format_units, NativeTokenSnapshot, TokenHolder, TokenSaleSnapshot},
};

/// Everything the overview needs, read in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub account: Option<Address>,
    pub chain_id: u64,
    /// Native currency balance of the account, in ether.
    pub native_balance: String,
    pub native_token: NativeTokenSnapshot,
    pub token_holders: Vec<Address>,
    /// The account's own holder record.
    pub current_holder: Option<TokenHolder>,
    pub token_sale: TokenSaleSnapshot,
}

#[derive(Clone)]
pub struct DashboardService {
    contracts: Arc<dyn ContractFactory>,
}

impl DashboardService {
    pub fn new(contracts: Arc<dyn ContractFactory>) -> Self {
        Self { contracts }
    }

    /// Read balances, the native token, its holders and the token sale.
    ///
    /// Without a caller account, balances read as zero and no holder record
    /// is fetched.
    pub async fn fetch_initial_data(&self) -> Result<DashboardSnapshot> {
        let account = self.contracts.caller();
        tracing::debug!(account = ?account, "Fetching dashboard data");

        let native_balance = match account {
            Some(owner) => self.contracts.native_balance(owner).await?,
            None => U256::ZERO,
        };

        let token = self.contracts.native_token()?;
        let native_token = self.native_token_snapshot(token.as_ref(), account).await?;
        let token_holders = token.token_holders().await?;
        let current_holder = match account {
            Some(owner) => Some(token.holder_data(owner).await?),
            None => None,
        };

        let sale = self.contracts.token_sale()?;
        let (price, sold, sale_balance) = tokio::try_join!(
            sale.token_price(),
            sale.tokens_sold(),
            sale.balance_of(sale.address())
        )?;

        Ok(DashboardSnapshot {
            account,
            chain_id: self.contracts.chain_id(),
            native_balance: format_units(native_balance, 18),
            native_token,
            token_holders,
            current_holder,
            token_sale: TokenSaleSnapshot {
                token_price: format_units(price, 18),
                tokens_sold: sold.to_string(),
                sale_balance: format_units(sale_balance, 18),
            },
        })
    }

    async fn native_token_snapshot(
        &self,
        token: &dyn NativeTokenContract,
        account: Option<Address>,
    ) -> Result<NativeTokenSnapshot> {
        let balance = async {
            match account {
                Some(owner) => token.balance_of(owner).await,
                None => Ok(U256::ZERO),
            }
        };

        let (name, symbol, decimals, total_supply, standard, owner, holder_count, balance) =
            tokio::try_join!(
                token.name(),
                token.symbol(),
                token.decimals(),
                token.total_supply(),
                token.standard(),
                token.owner(),
                token.holder_count(),
                balance
            )?;

        let holder_count: u64 = holder_count.try_into().map_err(|_| {
            AppError::NumericOverflow(format!("holder count {holder_count} exceeds u64 range"))
        })?;

        Ok(NativeTokenSnapshot {
            address: token.address(),
            name,
            symbol,
            standard,
            owner,
            total_supply: format_units(total_supply, decimals),
            balance: format_units(balance, decimals),
            holder_count,
        })
    }
}
