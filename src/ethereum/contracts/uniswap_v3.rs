//! Uniswap V3 contract bindings.

use alloy::{
    network::Ethereum,
    primitives::{
        aliases::{I24, U24},
        Address, TxHash, U256,
    },
    providers::{PendingTransactionBuilder, Provider},
    sol,
};
use async_trait::async_trait;

use super::{FactoryContract, PoolContract, PositionManagerContract};
use crate::{
    error::{AppError, Result},
    ethereum::{
        client::{mined, DappProvider},
        constants::FIXED_GAS_LIMIT,
    },
    types::{MintParameters, TransactionOutcome},
};

// Re-export Uniswap V3 addresses from constants module.
pub use crate::ethereum::constants::{UNISWAP_V3_FACTORY, UNISWAP_V3_POSITION_MANAGER};

/// Common fee tiers in Uniswap V3 (in basis points * 100).
pub mod fee_tiers {
    /// 0.01% fee tier.
    pub const FEE_LOWEST: u32 = 100;
    /// 0.05% fee tier.
    pub const FEE_LOW: u32 = 500;
    /// 0.30% fee tier.
    pub const FEE_MEDIUM: u32 = 3000;
    /// 1.00% fee tier.
    pub const FEE_HIGH: u32 = 10000;

    /// All available fee tiers.
    pub const ALL_FEES: [u32; 4] = [FEE_LOWEST, FEE_LOW, FEE_MEDIUM, FEE_HIGH];
}

// Uniswap V3 Factory interface
sol! {
    #[sol(rpc)]
    interface IUniswapV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }
}

// Uniswap V3 Pool interface
sol! {
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function fee() external view returns (uint24);
        function tickSpacing() external view returns (int24);
        function liquidity() external view returns (uint128);
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
    }
}

// Uniswap V3 NonfungiblePositionManager interface
sol! {
    #[sol(rpc, all_derives)]
    interface INonfungiblePositionManager {
        struct MintParams {
            address token0;
            address token1;
            uint24 fee;
            int24 tickLower;
            int24 tickUpper;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            address recipient;
            uint256 deadline;
        }

        function mint(MintParams calldata params) external payable returns (
            uint256 tokenId,
            uint128 liquidity,
            uint256 amount0,
            uint256 amount1
        );
    }
}

fn to_i24(tick: i32) -> Result<I24> {
    I24::try_from(tick).map_err(|_| AppError::TickOutOfRange(tick))
}

impl TryFrom<&MintParameters> for INonfungiblePositionManager::MintParams {
    type Error = AppError;

    fn try_from(params: &MintParameters) -> Result<Self> {
        Ok(Self {
            token0: params.token0,
            token1: params.token1,
            fee: U24::from(params.fee),
            tickLower: to_i24(params.tick_lower)?,
            tickUpper: to_i24(params.tick_upper)?,
            amount0Desired: params.amount0_desired,
            amount1Desired: params.amount1_desired,
            amount0Min: params.amount0_min,
            amount1Min: params.amount1_min,
            recipient: params.recipient,
            deadline: U256::from(params.deadline),
        })
    }
}

/// Alloy-backed Uniswap V3 factory binding.
#[derive(Clone)]
pub struct FactoryBinding {
    contract: IUniswapV3Factory::IUniswapV3FactoryInstance<DappProvider>,
}

impl FactoryBinding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self { contract: IUniswapV3Factory::new(address, provider) }
    }
}

#[async_trait]
impl FactoryContract for FactoryBinding {
    async fn get_pool(&self, token_a: Address, token_b: Address, fee: u32) -> Result<Address> {
        // fee is u32, convert to U24 for the contract call
        let pool = self
            .contract
            .getPool(token_a, token_b, U24::from(fee))
            .call()
            .await
            .map_err(|e| AppError::ContractCallFailed(format!("getPool failed: {e}")))?;
        Ok(pool)
    }
}

/// Alloy-backed Uniswap V3 pool binding.
#[derive(Clone)]
pub struct PoolBinding {
    contract: IUniswapV3Pool::IUniswapV3PoolInstance<DappProvider>,
}

impl PoolBinding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self { contract: IUniswapV3Pool::new(address, provider) }
    }

    fn call_failed(&self, method: &str, err: alloy::contract::Error) -> AppError {
        AppError::ContractCallFailed(format!(
            "{method}() on pool {} failed: {err}",
            self.contract.address()
        ))
    }
}

#[async_trait]
impl PoolContract for PoolBinding {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn tick_spacing(&self) -> Result<i32> {
        let spacing = self
            .contract
            .tickSpacing()
            .call()
            .await
            .map_err(|e| self.call_failed("tickSpacing", e))?;
        Ok(spacing.as_i32())
    }

    async fn fee(&self) -> Result<u32> {
        let fee = self.contract.fee().call().await.map_err(|e| self.call_failed("fee", e))?;
        Ok(fee.to::<u32>())
    }

    async fn liquidity(&self) -> Result<u128> {
        self.contract.liquidity().call().await.map_err(|e| self.call_failed("liquidity", e))
    }

    async fn slot0(&self) -> Result<(U256, i32)> {
        let slot0 = self.contract.slot0().call().await.map_err(|e| self.call_failed("slot0", e))?;
        Ok((U256::from(slot0.sqrtPriceX96), slot0.tick.as_i32()))
    }
}

/// Alloy-backed NonfungiblePositionManager binding.
#[derive(Clone)]
pub struct PositionManagerBinding {
    contract: INonfungiblePositionManager::INonfungiblePositionManagerInstance<DappProvider>,
    sender: Option<Address>,
}

impl PositionManagerBinding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self { contract: INonfungiblePositionManager::new(address, provider), sender: None }
    }

    /// Account the mint is simulated and sent from.
    pub fn with_sender(mut self, sender: Option<Address>) -> Self {
        self.sender = sender;
        self
    }
}

#[async_trait]
impl PositionManagerContract for PositionManagerBinding {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn submit_mint(&self, params: &MintParameters) -> Result<TxHash> {
        let call_params = INonfungiblePositionManager::MintParams::try_from(params)?;

        tracing::info!(
            token0 = %params.token0,
            token1 = %params.token1,
            fee = params.fee,
            tick_lower = params.tick_lower,
            tick_upper = params.tick_upper,
            deadline = params.deadline,
            "Submitting mint"
        );

        let mut call = self.contract.mint(call_params).gas(FIXED_GAS_LIMIT);
        if let Some(from) = self.sender {
            call = call.from(from);
        }

        // A fixed gas limit skips estimation, so simulate to surface reverts.
        // eth_call is not filled by the wallet, hence the explicit sender.
        call.call().await.map_err(|e| {
            tracing::warn!(error = %e, "Mint simulation failed");
            AppError::from_submission(e)
        })?;

        let pending = call.send().await.map_err(AppError::from_submission)?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, hash: TxHash) -> Result<TransactionOutcome> {
        let provider = self.contract.provider().root().clone();
        let pending = PendingTransactionBuilder::<Ethereum>::new(provider, hash);
        mined(pending).await
    }
}
