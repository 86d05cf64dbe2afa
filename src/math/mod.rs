//! Uniswap V3 position math.

pub mod liquidity_amounts;
pub mod tick_math;

pub use liquidity_amounts::{apply_slippage, mint_amounts, MintAmounts};
pub use tick_math::{
    get_sqrt_ratio_at_tick, nearest_usable_tick, tick_range, TickRange, MAX_TICK, MIN_TICK,
};
