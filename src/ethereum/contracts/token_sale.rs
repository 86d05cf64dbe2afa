//! Token sale contract bindings.

use alloy::{
    primitives::{Address, U256},
    sol,
};
use async_trait::async_trait;

use super::TokenSaleContract;
use crate::{
    error::{AppError, Result},
    ethereum::{
        client::{mined, DappProvider},
        constants::FIXED_GAS_LIMIT,
    },
    types::TransactionOutcome,
};

sol! {
    #[sol(rpc)]
    interface ITokenSale {
        function tokenPrice() external view returns (uint256);
        function tokenSold() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function buyTokens(uint256 _numberOfTokens) external payable;
    }
}

/// Alloy-backed binding for the token sale.
#[derive(Clone)]
pub struct TokenSaleBinding {
    contract: ITokenSale::ITokenSaleInstance<DappProvider>,
    sender: Option<Address>,
}

impl TokenSaleBinding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self { contract: ITokenSale::new(address, provider), sender: None }
    }

    /// Account the purchase is simulated and sent from.
    pub fn with_sender(mut self, sender: Option<Address>) -> Self {
        self.sender = sender;
        self
    }

    fn call_failed(&self, method: &str, err: alloy::contract::Error) -> AppError {
        AppError::ContractCallFailed(format!(
            "{method}() on token sale {} failed: {err}",
            self.contract.address()
        ))
    }
}

#[async_trait]
impl TokenSaleContract for TokenSaleBinding {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn token_price(&self) -> Result<U256> {
        self.contract.tokenPrice().call().await.map_err(|e| self.call_failed("tokenPrice", e))
    }

    async fn tokens_sold(&self) -> Result<U256> {
        self.contract.tokenSold().call().await.map_err(|e| self.call_failed("tokenSold", e))
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.contract.balanceOf(owner).call().await.map_err(|e| self.call_failed("balanceOf", e))
    }

    async fn buy_tokens(&self, count: U256, value: U256) -> Result<TransactionOutcome> {
        tracing::info!(
            sale = %self.contract.address(),
            count = %count,
            value = %value,
            "Submitting token purchase"
        );
        let mut call = self.contract.buyTokens(count).value(value).gas(FIXED_GAS_LIMIT);
        if let Some(from) = self.sender {
            call = call.from(from);
        }

        // A fixed gas limit skips estimation, so simulate to surface reverts.
        // eth_call is not filled by the wallet, hence the explicit sender.
        call.call().await.map_err(|e| {
            tracing::warn!(error = %e, "Purchase simulation failed");
            AppError::from_submission(e)
        })?;

        let pending = call.send().await.map_err(AppError::from_submission)?;
        mined(pending).await
    }
}
