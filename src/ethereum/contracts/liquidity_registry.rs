//! Liquidity registry contract bindings.

use alloy::{
    primitives::{Address, U256},
    sol,
};
use async_trait::async_trait;

use super::LiquidityRegistryContract;
use crate::{
    error::{AppError, Result},
    ethereum::client::{mined, DappProvider},
    types::{LiquidityRecord, RegistryEntry, TransactionOutcome},
};

sol! {
    #[sol(rpc)]
    interface ILiquidityRegistry {
        struct Liquidity {
            uint256 id;
            address owner;
            string network;
            address poolAddress;
            string tokenA;
            string tokenB;
            address tokenA_Address;
            address tokenB_Address;
            uint256 timeCreated;
            string transactionHash;
        }

        function addLiquidity(
            string memory _tokenA,
            string memory _tokenB,
            address _tokenA_Address,
            address _tokenB_Address,
            address _poolAddress,
            string memory _network,
            string memory _transactionHash
        ) external;

        function getAllLiquidity(address _address) external view returns (Liquidity[] memory);
    }
}

fn to_u64(field: &str, value: U256) -> Result<u64> {
    value
        .try_into()
        .map_err(|_| AppError::NumericOverflow(format!("{field} {value} exceeds u64 range")))
}

impl TryFrom<ILiquidityRegistry::Liquidity> for LiquidityRecord {
    type Error = AppError;

    fn try_from(raw: ILiquidityRegistry::Liquidity) -> Result<Self> {
        Ok(Self {
            id: to_u64("liquidity id", raw.id)?,
            network: raw.network,
            owner: raw.owner,
            pool_address: raw.poolAddress,
            token_a: raw.tokenA,
            token_b: raw.tokenB,
            token_a_address: raw.tokenA_Address,
            token_b_address: raw.tokenB_Address,
            time_created: to_u64("timeCreated", raw.timeCreated)?,
            transaction_hash: raw.transactionHash,
        })
    }
}

/// Alloy-backed binding for the liquidity registry.
#[derive(Clone)]
pub struct LiquidityRegistryBinding {
    contract: ILiquidityRegistry::ILiquidityRegistryInstance<DappProvider>,
}

impl LiquidityRegistryBinding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self { contract: ILiquidityRegistry::new(address, provider) }
    }
}

#[async_trait]
impl LiquidityRegistryContract for LiquidityRegistryBinding {
    async fn add_liquidity(&self, entry: &RegistryEntry) -> Result<TransactionOutcome> {
        tracing::info!(
            registry = %self.contract.address(),
            pool = %entry.pool_address,
            mint_tx = %entry.transaction_hash,
            "Recording liquidity position"
        );
        let pending = self
            .contract
            .addLiquidity(
                entry.token_a_name.clone(),
                entry.token_b_name.clone(),
                entry.token_a_address,
                entry.token_b_address,
                entry.pool_address,
                entry.network.clone(),
                entry.transaction_hash.clone(),
            )
            .send()
            .await
            .map_err(AppError::from_submission)?;
        mined(pending).await
    }

    async fn get_all_liquidity(&self, owner: Address) -> Result<Vec<LiquidityRecord>> {
        let raw = self.contract.getAllLiquidity(owner).call().await.map_err(|e| {
            AppError::ContractCallFailed(format!(
                "getAllLiquidity() on registry {} failed: {e}",
                self.contract.address()
            ))
        })?;

        tracing::debug!(owner = %owner, count = raw.len(), "Fetched liquidity records");
        raw.into_iter().map(LiquidityRecord::try_from).collect()
    }
}
