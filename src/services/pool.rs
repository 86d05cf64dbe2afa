//! Pool lookup service.

use alloy::primitives::Address;
use std::sync::Arc;

use super::history::PoolHistoryStore;
use crate::{
    error::Result,
    ethereum::contracts::{ContractFactory, PoolContract},
    types::{PoolLookup, PoolRecord, PoolState, TokenDescriptor},
};

/// Fees are fractions of 1_000_000; a pool cannot charge the whole amount.
const FEE_DENOMINATOR: u32 = 1_000_000;

/// Read the live state of a pool. Never cached.
pub async fn read_pool_state(pool: &dyn PoolContract) -> Result<PoolState> {
    let (tick_spacing, fee, liquidity, (sqrt_price_x96, tick)) =
        tokio::try_join!(pool.tick_spacing(), pool.fee(), pool.liquidity(), pool.slot0())?;

    tracing::debug!(
        pool = %pool.address(),
        tick_spacing,
        fee,
        liquidity = %liquidity,
        tick,
        "Read pool state"
    );

    Ok(PoolState { tick_spacing, fee, liquidity, sqrt_price_x96, tick })
}

/// Resolves token pairs to Uniswap V3 pools and records successful lookups.
#[derive(Clone)]
pub struct PoolLookupService {
    contracts: Arc<dyn ContractFactory>,
    history: Arc<dyn PoolHistoryStore>,
}

impl PoolLookupService {
    pub fn new(contracts: Arc<dyn ContractFactory>, history: Arc<dyn PoolHistoryStore>) -> Self {
        Self { contracts, history }
    }

    /// Ask the factory for the pool of a token pair and fee tier.
    ///
    /// `fee` is in hundredths of a basis point (3000 = 0.3%). A zero address
    /// from the factory means no pool exists; that outcome is returned as
    /// [`PoolLookup::NotFound`] and not recorded.
    pub async fn lookup_pool(
        &self,
        token_a: TokenDescriptor,
        token_b: TokenDescriptor,
        fee: u32,
    ) -> Result<PoolLookup> {
        // No pool exists at these fees, and they would not fit the factory's uint24.
        if fee >= FEE_DENOMINATOR {
            tracing::info!(fee, "Fee is out of range, no pool can exist");
            return Ok(PoolLookup::NotFound { fee });
        }

        tracing::info!(
            token_a = %token_a.address,
            token_b = %token_b.address,
            fee,
            "Looking up pool"
        );

        let pool_address =
            self.contracts.factory().get_pool(token_a.address, token_b.address, fee).await?;

        if pool_address == Address::ZERO {
            tracing::info!(
                token_a = %token_a.symbol,
                token_b = %token_b.symbol,
                fee,
                "No pool exists for pair"
            );
            return Ok(PoolLookup::NotFound { fee });
        }

        let record = PoolRecord {
            network: token_a.chain_id,
            token_a,
            token_b,
            fee,
            pool_address,
        };
        self.history.append(record.clone()).await?;

        tracing::info!(pool = %pool_address, fee, "Pool found");
        Ok(PoolLookup::Found(record))
    }

    /// Successful lookups in the order they were made.
    pub async fn history(&self) -> Result<Vec<PoolRecord>> {
        self.history.list().await
    }
}
