//! Liquidity provisioning.
//!
//! Minting a position and recording it in the registry are two separate
//! transactions. The registry write only happens after the mint is mined
//! successfully, and a failed registry write is not compensated: the mint stays
//! on chain and the error carries its hash for manual reconciliation.

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::SystemTime;

use super::pool::read_pool_state;
use crate::{
    error::{AppError, Result},
    ethereum::{
        constants::{MINT_DEADLINE_SECS, USER_AMOUNT_DECIMALS},
        contracts::ContractFactory,
    },
    math::{apply_slippage, mint_amounts, tick_range},
    types::{
        format_units, parse_units, LiquidityReceipt, LiquidityRecord, MintParameters, PoolRecord,
        RegistryEntry,
    },
};

/// Get current Unix timestamp in seconds.
/// Returns 0 if system time is before Unix epoch (should never happen in practice).
fn current_timestamp() -> u64 {
    SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

fn sort_tokens(a: Address, b: Address) -> (Address, Address) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn parse_user_amount(field: &str, raw: &str) -> Result<U256> {
    let amount = parse_units(raw, USER_AMOUNT_DECIMALS)
        .map_err(|e| AppError::Parse(format!("Invalid {field} '{raw}': {e}")))?;
    if amount.is_zero() {
        return Err(AppError::Parse(format!("{field} must be greater than zero")));
    }
    Ok(amount)
}

/// Creates Uniswap V3 positions and records them in the liquidity registry.
#[derive(Clone)]
pub struct LiquidityOrchestrator {
    contracts: Arc<dyn ContractFactory>,
    slippage_tolerance: Decimal,
}

impl LiquidityOrchestrator {
    /// `slippage_tolerance` is a percentage (0.5 = 0.5%).
    pub fn new(contracts: Arc<dyn ContractFactory>, slippage_tolerance: Decimal) -> Self {
        Self { contracts, slippage_tolerance }
    }

    /// Mint a position around the current price of `record`'s pool and
    /// register it.
    ///
    /// `liquidity_amount` and `approve_amount` are decimal strings in 18-decimal
    /// units. The range spans two tick spacings either side of the current tick.
    /// Both token approvals are mined before the mint is submitted.
    pub async fn create_liquidity(
        &self,
        record: &PoolRecord,
        liquidity_amount: &str,
        approve_amount: &str,
    ) -> Result<LiquidityReceipt> {
        let recipient = self.contracts.caller().ok_or(AppError::WalletUnavailable)?;
        let registry = self.contracts.liquidity_registry()?;

        let liquidity: u128 = parse_user_amount("liquidity amount", liquidity_amount)?
            .try_into()
            .map_err(|_| {
                AppError::NumericOverflow(format!(
                    "liquidity {liquidity_amount} exceeds the uint128 range"
                ))
            })?;
        let approval = parse_user_amount("approve amount", approve_amount)?;

        tracing::info!(
            pool = %record.pool_address,
            token_a = %record.token_a.symbol,
            token_b = %record.token_b.symbol,
            liquidity = %liquidity,
            "Creating liquidity position"
        );

        let pool = self.contracts.pool(record.pool_address);
        let state = read_pool_state(pool.as_ref()).await?;

        let range = tick_range(state.tick, state.tick_spacing)?;
        let amounts = mint_amounts(range, state.tick, state.sqrt_price_x96, liquidity)?;
        let amount0_min = apply_slippage(amounts.amount0, self.slippage_tolerance)?;
        let amount1_min = apply_slippage(amounts.amount1, self.slippage_tolerance)?;

        let (token0, token1) = sort_tokens(record.token_a.address, record.token_b.address);
        let manager = self.contracts.position_manager();

        for token in [token0, token1] {
            self.contracts.token(token).approve(manager.address(), approval).await?.confirmed()?;
        }

        let params = MintParameters {
            token0,
            token1,
            fee: state.fee,
            tick_lower: range.lower,
            tick_upper: range.upper,
            amount0_desired: amounts.amount0,
            amount1_desired: amounts.amount1,
            amount0_min,
            amount1_min,
            recipient,
            deadline: current_timestamp() + MINT_DEADLINE_SECS,
        };

        let mint_hash = manager.submit_mint(&params).await?;
        let mint = manager.confirm(mint_hash).await?.confirmed()?;
        tracing::info!(tx = %mint_hash, "Mint confirmed");

        let entry = RegistryEntry {
            token_a_name: record.token_a.name.clone(),
            token_b_name: record.token_b.name.clone(),
            token_a_address: record.token_a.address,
            token_b_address: record.token_b.address,
            pool_address: record.pool_address,
            network: record.token_b.chain_id.to_string(),
            transaction_hash: mint_hash.to_string(),
        };

        let registry_write = registry.add_liquidity(&entry).await.and_then(|o| o.confirmed());
        let registered = match registry_write {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    mint_tx = %mint_hash,
                    error = %e,
                    "Position minted but registry write failed"
                );
                return Err(AppError::RegistryWriteFailed {
                    mint_tx: mint_hash,
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(
            mint_tx = %mint_hash,
            registry_tx = %registered.hash,
            "Liquidity position recorded"
        );

        Ok(LiquidityReceipt {
            mint,
            registry: registered,
            tick_lower: range.lower,
            tick_upper: range.upper,
            amount0_desired: format_units(amounts.amount0, record_decimals(record, token0)),
            amount1_desired: format_units(amounts.amount1, record_decimals(record, token1)),
            amount0_min: format_units(amount0_min, record_decimals(record, token0)),
            amount1_min: format_units(amount1_min, record_decimals(record, token1)),
        })
    }

    /// Positions the registry holds for `owner`.
    pub async fn get_all_liquidity(&self, owner: Address) -> Result<Vec<LiquidityRecord>> {
        let records = self.contracts.liquidity_registry()?.get_all_liquidity(owner).await?;
        tracing::debug!(owner = %owner, count = records.len(), "Loaded liquidity positions");
        Ok(records)
    }
}

fn record_decimals(record: &PoolRecord, token: Address) -> u8 {
    if token == record.token_a.address {
        record.token_a.decimals
    } else {
        record.token_b.decimals
    }
}
