//! Token amounts backing a liquidity position.
//!
//! Amounts are rounded up, matching what the position manager pulls from the
//! minter.

use alloy::primitives::{U256, U512};
use rust_decimal::Decimal;

use super::tick_math::{get_sqrt_ratio_at_tick, TickRange};
use crate::error::{AppError, Result};

const Q96_SHIFT: usize = 96;

/// Token amounts for a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintAmounts {
    pub amount0: U256,
    pub amount1: U256,
}

fn widen(value: U256) -> U512 {
    let limbs = value.as_limbs();
    U512::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

fn narrow(value: U512) -> Option<U256> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|&limb| limb != 0) {
        return None;
    }
    Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// `a * b / denominator` with a 512-bit intermediate.
fn mul_div(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256> {
    if denominator.is_zero() {
        return Err(AppError::NumericOverflow("division by zero".into()));
    }
    let product = widen(a) * widen(b);
    let denominator = widen(denominator);

    let mut quotient = product / denominator;
    if round_up && !(product % denominator).is_zero() {
        quotient += U512::from(1u8);
    }

    narrow(quotient)
        .ok_or_else(|| AppError::NumericOverflow(format!("{a} * {b} does not fit in 256 bits")))
}

fn div_rounding_up(a: U256, b: U256) -> U256 {
    let quotient = a / b;
    if (a % b).is_zero() {
        quotient
    } else {
        quotient + U256::from(1u8)
    }
}

fn ordered(a: U256, b: U256) -> (U256, U256) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Token0 needed for `liquidity` between two sqrt prices, rounded up.
pub fn amount0_delta(sqrt_a_x96: U256, sqrt_b_x96: U256, liquidity: u128) -> Result<U256> {
    let (lower, upper) = ordered(sqrt_a_x96, sqrt_b_x96);
    if liquidity == 0 || lower == upper {
        return Ok(U256::ZERO);
    }
    if lower.is_zero() {
        return Err(AppError::NumericOverflow("sqrt price of zero".into()));
    }

    let numerator1 = U256::from(liquidity) << Q96_SHIFT;
    let numerator2 = upper - lower;

    let scaled = mul_div(numerator1, numerator2, upper, true)?;
    Ok(div_rounding_up(scaled, lower))
}

/// Token1 needed for `liquidity` between two sqrt prices, rounded up.
pub fn amount1_delta(sqrt_a_x96: U256, sqrt_b_x96: U256, liquidity: u128) -> Result<U256> {
    let (lower, upper) = ordered(sqrt_a_x96, sqrt_b_x96);
    if liquidity == 0 || lower == upper {
        return Ok(U256::ZERO);
    }

    mul_div(U256::from(liquidity), upper - lower, U256::from(1u8) << Q96_SHIFT, true)
}

/// Amounts required to mint `liquidity` over `range` at the pool's current price.
///
/// Below the range only token0 is needed, above it only token1.
pub fn mint_amounts(
    range: TickRange,
    current_tick: i32,
    sqrt_price_x96: U256,
    liquidity: u128,
) -> Result<MintAmounts> {
    let sqrt_lower = get_sqrt_ratio_at_tick(range.lower)?;
    let sqrt_upper = get_sqrt_ratio_at_tick(range.upper)?;

    let amounts = if current_tick < range.lower {
        MintAmounts {
            amount0: amount0_delta(sqrt_lower, sqrt_upper, liquidity)?,
            amount1: U256::ZERO,
        }
    } else if current_tick < range.upper {
        MintAmounts {
            amount0: amount0_delta(sqrt_price_x96, sqrt_upper, liquidity)?,
            amount1: amount1_delta(sqrt_lower, sqrt_price_x96, liquidity)?,
        }
    } else {
        MintAmounts {
            amount0: U256::ZERO,
            amount1: amount1_delta(sqrt_lower, sqrt_upper, liquidity)?,
        }
    };

    Ok(amounts)
}

/// Smallest amount accepted for `amount` under `slippage_percent`, rounded down.
///
/// `slippage_percent` is a percentage, so `0.5` keeps 99.5% of `amount`.
pub fn apply_slippage(amount: U256, slippage_percent: Decimal) -> Result<U256> {
    if slippage_percent < Decimal::ZERO || slippage_percent > Decimal::ONE_HUNDRED {
        return Err(AppError::Parse(format!(
            "Slippage tolerance must be between 0 and 100 (percentage), got {slippage_percent}"
        )));
    }

    let slippage = slippage_percent.normalize();
    let scale = U256::from(10u8).pow(U256::from(slippage.scale()));
    let denominator = U256::from(100u8) * scale;
    let kept = denominator - U256::from(slippage.mantissa().unsigned_abs());

    mul_div(amount, kept, denominator, false)
}
