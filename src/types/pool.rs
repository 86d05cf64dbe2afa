//! Pool-related types.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::TokenDescriptor;

/// A successful pool lookup, as persisted in the lookup history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    /// First token as entered by the user.
    #[serde(rename = "token_A")]
    pub token_a: TokenDescriptor,
    /// Second token as entered by the user.
    #[serde(rename = "token_B")]
    pub token_b: TokenDescriptor,
    /// Fee tier in hundredths of a basis point (3000 = 0.3%).
    pub fee: u32,
    /// Chain ID the pool lives on.
    pub network: u64,
    /// Pool contract address.
    #[serde(rename = "poolAddress")]
    pub pool_address: Address,
}

/// Outcome of a pool lookup. A missing pool is a valid answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PoolLookup {
    /// The factory knows a pool for the pair and fee.
    Found(PoolRecord),
    /// The factory returned the zero address.
    NotFound { fee: u32 },
}

impl PoolLookup {
    /// Pool address, or the zero sentinel when no pool exists.
    pub fn pool_address(&self) -> Address {
        match self {
            PoolLookup::Found(record) => record.pool_address,
            PoolLookup::NotFound { .. } => Address::ZERO,
        }
    }

    /// Whether a pool was found.
    pub fn is_found(&self) -> bool {
        matches!(self, PoolLookup::Found(_))
    }
}

/// Live state of a Uniswap V3 pool, read fresh for every liquidity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub tick_spacing: i32,
    pub fee: u32,
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    /// Current tick from `slot0`.
    pub tick: i32,
}
