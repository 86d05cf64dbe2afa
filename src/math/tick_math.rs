//! Tick arithmetic for Uniswap V3 pools.

use alloy::primitives::{uint, U256};

use crate::error::{AppError, Result};

/// Lowest tick a V3 pool accepts.
pub const MIN_TICK: i32 = -887_272;
/// Highest tick a V3 pool accepts.
pub const MAX_TICK: i32 = 887_272;

/// Tick spacings placed on each side of the current tick when minting.
pub const RANGE_WIDTH_SPACINGS: i32 = 2;

/// Largest spacing a pool can report (int24 max).
pub const MAX_TICK_SPACING: i32 = 8_388_607;

/// Snap `tick` to the nearest multiple of `tick_spacing`.
///
/// Ties go to the even multiple. A result past either tick bound is pulled
/// back inside by one spacing step.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32> {
    if !(1..=MAX_TICK_SPACING).contains(&tick_spacing) {
        return Err(AppError::Parse(format!(
            "tick spacing must be between 1 and {MAX_TICK_SPACING}, got {tick_spacing}"
        )));
    }
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(AppError::TickOutOfRange(tick));
    }

    let quotient = tick.div_euclid(tick_spacing);
    let remainder = tick.rem_euclid(tick_spacing);

    let multiple = match (2 * remainder).cmp(&tick_spacing) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    };

    let rounded = multiple * tick_spacing;
    if rounded < MIN_TICK {
        Ok(rounded + tick_spacing)
    } else if rounded > MAX_TICK {
        Ok(rounded - tick_spacing)
    } else {
        Ok(rounded)
    }
}

/// Tick band minted around the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub lower: i32,
    /// Current tick snapped to the spacing grid.
    pub snapped: i32,
    pub upper: i32,
}

/// Band of [`RANGE_WIDTH_SPACINGS`] spacings either side of the snapped tick.
pub fn tick_range(current_tick: i32, tick_spacing: i32) -> Result<TickRange> {
    let snapped = nearest_usable_tick(current_tick, tick_spacing)?;
    let width = tick_spacing * RANGE_WIDTH_SPACINGS;

    let lower = snapped - width;
    let upper = snapped + width;

    if lower < MIN_TICK {
        return Err(AppError::TickOutOfRange(lower));
    }
    if upper > MAX_TICK {
        return Err(AppError::TickOutOfRange(upper));
    }

    Ok(TickRange { lower, snapped, upper })
}

/// sqrt(1.0001^tick) as a Q64.96 fixed-point number.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(AppError::TickOutOfRange(tick));
    }
    let abs_tick = tick.unsigned_abs();

    // Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        uint!(0xfffcb933bd6fad37aa2d162d1a594001_U256)
    } else {
        U256::from(1u8) << 128
    };

    const FACTORS: [(u32, U256); 19] = [
        (0x2, uint!(0xfff97272373d413259a46990580e213a_U256)),
        (0x4, uint!(0xfff2e50f5f656932ef12357cf3c7fdcc_U256)),
        (0x8, uint!(0xffe5caca7e10e4e61c3624eaa0941cd0_U256)),
        (0x10, uint!(0xffcb9843d60f6159c9db58835c926644_U256)),
        (0x20, uint!(0xff973b41fa98c081472e6896dfb254c0_U256)),
        (0x40, uint!(0xff2ea16466c96a3843ec78b326b52861_U256)),
        (0x80, uint!(0xfe5dee046a99a2a811c461f1969c3053_U256)),
        (0x100, uint!(0xfcbe86c7900a88aedcffc83b479aa3a4_U256)),
        (0x200, uint!(0xf987a7253ac413176f2b074cf7815e54_U256)),
        (0x400, uint!(0xf3392b0822b70005940c7a398e4b70f3_U256)),
        (0x800, uint!(0xe7159475a2c29b7443b29c7fa6e889d9_U256)),
        (0x1000, uint!(0xd097f3bdfd2022b8845ad8f792aa5825_U256)),
        (0x2000, uint!(0xa9f746462d870fdf8a65dc1f90e061e5_U256)),
        (0x4000, uint!(0x70d869a156d2a1b890bb3df62baf32f7_U256)),
        (0x8000, uint!(0x31be135f97d08fd981231505542fcfa6_U256)),
        (0x10000, uint!(0x9aa508b5b7a84e1c677de54f3e99bc9_U256)),
        (0x20000, uint!(0x5d6af8dedb81196699c329225ee604_U256)),
        (0x40000, uint!(0x2216e584f5fa1ea926041bedfe98_U256)),
        (0x80000, uint!(0x48a170391f7dc42444e8fa2_U256)),
    ];

    for (bit, factor) in FACTORS {
        if abs_tick & bit != 0 {
            ratio = (ratio * factor) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up
    let shifted = ratio >> 32;
    let remainder = ratio & U256::from(u32::MAX);
    Ok(if remainder.is_zero() { shifted } else { shifted + U256::from(1u8) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_usable_tick_rounds_to_nearest() {
        assert_eq!(nearest_usable_tick(0, 60).unwrap(), 0);
        assert_eq!(nearest_usable_tick(29, 60).unwrap(), 0);
        assert_eq!(nearest_usable_tick(31, 60).unwrap(), 60);
        assert_eq!(nearest_usable_tick(-29, 60).unwrap(), 0);
        assert_eq!(nearest_usable_tick(-31, 60).unwrap(), -60);
        assert_eq!(nearest_usable_tick(-202_139, 10).unwrap(), -202_140);
    }

    #[test]
    fn test_nearest_usable_tick_ties_to_even_multiple() {
        // 30 lies halfway between 0 (multiple 0) and 60 (multiple 1).
        assert_eq!(nearest_usable_tick(30, 60).unwrap(), 0);
        // 90 lies halfway between 60 (multiple 1) and 120 (multiple 2).
        assert_eq!(nearest_usable_tick(90, 60).unwrap(), 120);
        assert_eq!(nearest_usable_tick(-30, 60).unwrap(), 0);
        assert_eq!(nearest_usable_tick(-90, 60).unwrap(), -120);
        assert_eq!(nearest_usable_tick(5, 10).unwrap(), 0);
        assert_eq!(nearest_usable_tick(15, 10).unwrap(), 20);
    }

    #[test]
    fn test_nearest_usable_tick_is_idempotent() {
        for spacing in [1, 10, 60, 200] {
            for tick in [-887_272, -100_003, -61, -30, 0, 7, 30, 45, 12_345, 887_272] {
                let once = nearest_usable_tick(tick, spacing).unwrap();
                let twice = nearest_usable_tick(once, spacing).unwrap();
                assert_eq!(once, twice, "tick {tick} spacing {spacing}");
                assert_eq!(once % spacing, 0);
            }
        }
    }

    #[test]
    fn test_nearest_usable_tick_stays_within_bounds() {
        assert_eq!(nearest_usable_tick(MAX_TICK, 60).unwrap(), 887_220);
        assert_eq!(nearest_usable_tick(MIN_TICK, 60).unwrap(), -887_220);
        assert_eq!(nearest_usable_tick(MAX_TICK, 200).unwrap(), 887_200);
    }

    #[test]
    fn test_nearest_usable_tick_rejects_bad_input() {
        assert!(matches!(nearest_usable_tick(0, 0), Err(AppError::Parse(_))));
        assert!(matches!(nearest_usable_tick(0, -10), Err(AppError::Parse(_))));
        assert!(matches!(nearest_usable_tick(MAX_TICK + 1, 10), Err(AppError::TickOutOfRange(_))));
    }

    #[test]
    fn test_oversized_tick_spacing_is_rejected() {
        for spacing in [MAX_TICK_SPACING + 1, i32::MAX] {
            assert!(matches!(nearest_usable_tick(0, spacing), Err(AppError::Parse(_))));
            assert!(matches!(tick_range(MAX_TICK, spacing), Err(AppError::Parse(_))));
        }

        assert_eq!(nearest_usable_tick(MAX_TICK, MAX_TICK_SPACING).unwrap(), 0);
        let err = tick_range(0, MAX_TICK_SPACING).unwrap_err();
        assert!(matches!(err, AppError::TickOutOfRange(-16_777_214)));
    }

    #[test]
    fn test_tick_range_brackets_snapped_tick() {
        for spacing in [1, 10, 60, 200] {
            for tick in [-500_000, -1, 0, 1, 77, 201_234] {
                let range = tick_range(tick, spacing).unwrap();
                assert!(range.lower < range.snapped && range.snapped < range.upper);
                assert_eq!(range.upper - range.snapped, 2 * spacing);
                assert_eq!(range.snapped - range.lower, 2 * spacing);
            }
        }
    }

    #[test]
    fn test_tick_range_at_bounds_is_out_of_range() {
        let err = tick_range(MAX_TICK, 60).unwrap_err();
        assert!(matches!(err, AppError::TickOutOfRange(887_340)));

        let err = tick_range(MIN_TICK, 60).unwrap_err();
        assert!(matches!(err, AppError::TickOutOfRange(-887_340)));
    }

    #[test]
    fn test_sqrt_ratio_reference_points() {
        assert_eq!(get_sqrt_ratio_at_tick(0).unwrap(), U256::from(1u8) << 96);
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK).unwrap(), U256::from(4_295_128_739u64));
        assert_eq!(
            get_sqrt_ratio_at_tick(MAX_TICK).unwrap(),
            uint!(1461446703485210103287273052203988822378723970342_U256)
        );
    }

    #[test]
    fn test_sqrt_ratio_is_monotonic() {
        let mut previous = get_sqrt_ratio_at_tick(-1000).unwrap();
        for tick in -999..=1000 {
            let current = get_sqrt_ratio_at_tick(tick).unwrap();
            assert!(current > previous, "tick {tick}");
            previous = current;
        }
    }

    #[test]
    fn test_sqrt_ratio_rejects_out_of_range() {
        assert!(matches!(get_sqrt_ratio_at_tick(MIN_TICK - 1), Err(AppError::TickOutOfRange(_))));
    }
}
