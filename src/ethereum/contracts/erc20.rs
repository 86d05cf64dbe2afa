//! ERC20 contract bindings.

use alloy::{
    primitives::{Address, U256},
    sol,
};
use async_trait::async_trait;

use super::TokenContract;
use crate::{
    error::{AppError, Result},
    ethereum::client::{mined, DappProvider},
    types::TransactionOutcome,
};

// ERC20 interface
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Alloy-backed ERC20 binding.
#[derive(Clone)]
pub struct Erc20Binding {
    contract: IERC20::IERC20Instance<DappProvider>,
}

impl Erc20Binding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self { contract: IERC20::new(address, provider) }
    }

    fn call_failed(&self, method: &str, err: alloy::contract::Error) -> AppError {
        AppError::ContractCallFailed(format!(
            "{method}() on token {} failed: {err}",
            self.contract.address()
        ))
    }
}

#[async_trait]
impl TokenContract for Erc20Binding {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn name(&self) -> Result<String> {
        self.contract.name().call().await.map_err(|e| self.call_failed("name", e))
    }

    async fn symbol(&self) -> Result<String> {
        self.contract.symbol().call().await.map_err(|e| self.call_failed("symbol", e))
    }

    async fn decimals(&self) -> Result<u8> {
        self.contract.decimals().call().await.map_err(|e| self.call_failed("decimals", e))
    }

    async fn total_supply(&self) -> Result<U256> {
        self.contract.totalSupply().call().await.map_err(|e| self.call_failed("totalSupply", e))
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.contract.balanceOf(owner).call().await.map_err(|e| self.call_failed("balanceOf", e))
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionOutcome> {
        tracing::info!(
            token = %self.contract.address(),
            spender = %spender,
            amount = %amount,
            "Submitting approval"
        );
        let pending = self
            .contract
            .approve(spender, amount)
            .send()
            .await
            .map_err(AppError::from_submission)?;
        mined(pending).await
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TransactionOutcome> {
        tracing::info!(
            token = %self.contract.address(),
            to = %to,
            amount = %amount,
            "Submitting transfer"
        );
        let pending =
            self.contract.transfer(to, amount).send().await.map_err(AppError::from_submission)?;
        mined(pending).await
    }
}
