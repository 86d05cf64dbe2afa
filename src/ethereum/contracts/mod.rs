//! Smart contract bindings.
//!
//! Every contract the DApp talks to is reached through a role trait with fixed
//! signatures. The alloy-backed implementations live in the submodules; tests
//! substitute in-memory doubles.

pub mod erc20;
pub mod liquidity_registry;
pub mod native_token;
pub mod token_sale;
pub mod uniswap_v3;

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::{
    error::Result,
    types::{LiquidityRecord, MintParameters, RegistryEntry, TokenHolder, TransactionOutcome},
};

/// ERC20 token.
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// Contract address.
    fn address(&self) -> Address;
    async fn name(&self) -> Result<String>;
    async fn symbol(&self) -> Result<String>;
    async fn decimals(&self) -> Result<u8>;
    async fn total_supply(&self) -> Result<U256>;
    async fn balance_of(&self, owner: Address) -> Result<U256>;
    /// Approve `spender` and wait for the transaction to be mined.
    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionOutcome>;
    /// Transfer to `to` and wait for the transaction to be mined.
    async fn transfer(&self, to: Address, amount: U256) -> Result<TransactionOutcome>;
}

/// The project's own token, an ERC20 that also tracks its holders.
#[async_trait]
pub trait NativeTokenContract: TokenContract {
    async fn standard(&self) -> Result<String>;
    async fn owner(&self) -> Result<Address>;
    async fn holder_count(&self) -> Result<U256>;
    async fn token_holders(&self) -> Result<Vec<Address>>;
    async fn holder_data(&self, holder: Address) -> Result<TokenHolder>;
}

/// Fixed-price token sale.
#[async_trait]
pub trait TokenSaleContract: Send + Sync {
    fn address(&self) -> Address;
    async fn token_price(&self) -> Result<U256>;
    async fn tokens_sold(&self) -> Result<U256>;
    async fn balance_of(&self, owner: Address) -> Result<U256>;
    /// Buy `count` tokens paying `value` wei, waiting for the receipt.
    async fn buy_tokens(&self, count: U256, value: U256) -> Result<TransactionOutcome>;
}

/// Uniswap V3 factory.
#[async_trait]
pub trait FactoryContract: Send + Sync {
    async fn get_pool(&self, token_a: Address, token_b: Address, fee: u32) -> Result<Address>;
}

/// Uniswap V3 pool.
#[async_trait]
pub trait PoolContract: Send + Sync {
    fn address(&self) -> Address;
    async fn tick_spacing(&self) -> Result<i32>;
    async fn fee(&self) -> Result<u32>;
    async fn liquidity(&self) -> Result<u128>;
    /// `(sqrtPriceX96, tick)` from `slot0`.
    async fn slot0(&self) -> Result<(U256, i32)>;
}

/// Uniswap V3 NonfungiblePositionManager.
#[async_trait]
pub trait PositionManagerContract: Send + Sync {
    fn address(&self) -> Address;
    /// Submit a mint and return its hash without waiting for inclusion.
    async fn submit_mint(&self, params: &MintParameters) -> Result<TxHash>;
    /// Wait for a previously submitted transaction to be mined.
    async fn confirm(&self, hash: TxHash) -> Result<TransactionOutcome>;
}

/// Registry of liquidity positions created through the DApp.
#[async_trait]
pub trait LiquidityRegistryContract: Send + Sync {
    async fn add_liquidity(&self, entry: &RegistryEntry) -> Result<TransactionOutcome>;
    async fn get_all_liquidity(&self, owner: Address) -> Result<Vec<LiquidityRecord>>;
}

/// Hands out role objects bound to one provider handle.
#[async_trait]
pub trait ContractFactory: Send + Sync {
    /// Account able to sign, if this factory holds a write handle.
    fn caller(&self) -> Option<Address>;
    /// Chain the handle is connected to.
    fn chain_id(&self) -> u64;
    /// Native currency balance of `owner`, in wei.
    async fn native_balance(&self, owner: Address) -> Result<U256>;
    fn token(&self, address: Address) -> Arc<dyn TokenContract>;
    fn pool(&self, address: Address) -> Arc<dyn PoolContract>;
    fn factory(&self) -> Arc<dyn FactoryContract>;
    fn position_manager(&self) -> Arc<dyn PositionManagerContract>;
    fn native_token(&self) -> Result<Arc<dyn NativeTokenContract>>;
    fn token_sale(&self) -> Result<Arc<dyn TokenSaleContract>>;
    fn liquidity_registry(&self) -> Result<Arc<dyn LiquidityRegistryContract>>;
}
