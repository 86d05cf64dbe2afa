//! Liquidity position and transaction types.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

/// Arguments of a position manager `mint` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParameters {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub recipient: Address,
    /// Unix timestamp after which the mint reverts.
    pub deadline: u64,
}

/// Arguments of a liquidity registry `addLiquidity` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub token_a_name: String,
    pub token_b_name: String,
    pub token_a_address: Address,
    pub token_b_address: Address,
    pub pool_address: Address,
    /// Chain id rendered as a decimal string.
    pub network: String,
    /// Hash of the mint transaction, 0x-prefixed hex.
    pub transaction_hash: String,
}

/// A position recorded in the liquidity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRecord {
    pub id: u64,
    pub network: String,
    pub owner: Address,
    pub pool_address: Address,
    pub token_a: String,
    pub token_b: String,
    pub token_a_address: Address,
    pub token_b_address: Address,
    /// Unix timestamp of the registry write.
    pub time_created: u64,
    pub transaction_hash: String,
}

/// A submitted transaction after it was mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub hash: TxHash,
    /// Receipt status.
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Result of a completed mint-then-register sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquidityReceipt {
    pub mint: TransactionOutcome,
    pub registry: TransactionOutcome,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: String,
    pub amount1_desired: String,
    pub amount0_min: String,
    pub amount1_min: String,
}

/// Result of a token purchase or transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleReceipt {
    pub transaction: TransactionOutcome,
    /// Tokens bought or transferred.
    pub tokens: String,
    /// Native currency paid, human-readable. Zero for transfers.
    pub paid: String,
}

impl TransactionOutcome {
    /// Turn a mined-but-failed receipt into an error carrying its hash.
    pub fn confirmed(self) -> crate::error::Result<Self> {
        if self.succeeded {
            Ok(self)
        } else {
            Err(crate::error::AppError::TransactionReverted {
                hash: Some(self.hash),
                reason: match self.block_number {
                    Some(block) => format!("transaction failed in block {block}"),
                    None => "transaction mined with failed status".to_string(),
                },
            })
        }
    }
}
