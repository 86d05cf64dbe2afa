//! Token sale purchases and native token transfers.

use alloy::primitives::U256;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::{
        constants::{FIXED_ALLOCATION_TOKENS, TOKEN_SALE_UNIT_PRICE_WEI, USER_AMOUNT_DECIMALS},
        contracts::ContractFactory,
    },
    types::{format_units, SaleReceipt},
};

/// Price of `count` tokens in wei.
pub fn sale_payment(count: u64) -> Result<U256> {
    TOKEN_SALE_UNIT_PRICE_WEI
        .checked_mul(U256::from(count))
        .ok_or_else(|| AppError::NumericOverflow(format!("payment for {count} tokens overflows")))
}

/// Buys from the token sale and funds it with native tokens.
#[derive(Clone)]
pub struct SaleService {
    contracts: Arc<dyn ContractFactory>,
}

impl SaleService {
    pub fn new(contracts: Arc<dyn ContractFactory>) -> Self {
        Self { contracts }
    }

    /// Buy `count` tokens at the fixed unit price of 0.0001 ether.
    pub async fn buy_tokens(&self, count: u64) -> Result<SaleReceipt> {
        self.contracts.caller().ok_or(AppError::WalletUnavailable)?;
        if count == 0 {
            return Err(AppError::Parse("Token count must be greater than zero".into()));
        }

        let payment = sale_payment(count)?;
        tracing::info!(count, payment = %payment, "Buying tokens");

        let sale = self.contracts.token_sale()?;
        let outcome = sale.buy_tokens(U256::from(count), payment).await?.confirmed()?;

        Ok(SaleReceipt {
            transaction: outcome,
            tokens: count.to_string(),
            paid: format_units(payment, 18),
        })
    }

    /// Transfer the fixed 2000-token allocation to the sale contract.
    ///
    /// The amount does not depend on the caller's balance; a short balance
    /// makes the transfer revert.
    pub async fn transfer_fixed_allocation(&self) -> Result<SaleReceipt> {
        self.contracts.caller().ok_or(AppError::WalletUnavailable)?;

        let sale = self.contracts.token_sale()?;
        let token = self.contracts.native_token()?;
        let amount = U256::from(FIXED_ALLOCATION_TOKENS)
            * U256::from(10u8).pow(U256::from(USER_AMOUNT_DECIMALS));

        tracing::info!(to = %sale.address(), amount = %amount, "Transferring fixed allocation");

        let outcome = token.transfer(sale.address(), amount).await?.confirmed()?;

        Ok(SaleReceipt {
            transaction: outcome,
            tokens: FIXED_ALLOCATION_TOKENS.to_string(),
            paid: "0".to_string(),
        })
    }
}
