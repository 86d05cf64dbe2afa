//! Token metadata queries.

use alloy::primitives::{Address, U256};
use std::sync::Arc;

use crate::{
    error::Result,
    ethereum::contracts::ContractFactory,
    types::{format_units, TokenDescriptor},
};

/// Reads ERC20 metadata for arbitrary token addresses.
#[derive(Clone)]
pub struct TokenQueryService {
    contracts: Arc<dyn ContractFactory>,
}

impl TokenQueryService {
    pub fn new(contracts: Arc<dyn ContractFactory>) -> Self {
        Self { contracts }
    }

    /// Fetch a token's metadata and the caller's balance.
    ///
    /// The five reads run concurrently. Any failing read fails the whole query,
    /// so an address that is not a token surfaces as `ContractCallFailed`.
    /// Without a caller account the balance is reported as zero.
    pub async fn query_token(&self, address: Address) -> Result<TokenDescriptor> {
        tracing::debug!(token = %address, "Querying token metadata");

        let token = self.contracts.token(address);
        let caller = self.contracts.caller();

        let balance = async {
            match caller {
                Some(owner) => token.balance_of(owner).await,
                None => Ok(U256::ZERO),
            }
        };

        let (name, symbol, decimals, total_supply, balance) = tokio::try_join!(
            token.name(),
            token.symbol(),
            token.decimals(),
            token.total_supply(),
            balance
        )
        .inspect_err(|e| tracing::warn!(token = %address, error = %e, "Token query failed"))?;

        Ok(TokenDescriptor {
            address,
            name,
            symbol,
            decimals,
            total_supply: format_units(total_supply, decimals),
            balance: format_units(balance, decimals),
            chain_id: self.contracts.chain_id(),
        })
    }
}
