//! 18-decimal WAD fixed-point arithmetic.
//!
//! All intermediate products are widened through `ethnum::U256` so that
//! `mul_div_*` never overflows for any pair of `u128` operands, matching the
//! unsigned-256-bit intermediate math the pricing pipeline requires.

use ethnum::U256;

use crate::error::{CoreError, Result};

/// 10^18, the fixed-point scale all prices and percentages pass through.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// 10_000, the scale basis points are expressed in.
pub const BPS: u128 = 10_000;

fn widen(x: u128) -> U256 {
    U256::from(x)
}

fn narrow(x: U256, ctx: &'static str) -> Result<u128> {
    u128::try_from(x).map_err(|_| CoreError::Overflow(ctx))
}

/// `floor(a * b / d)`.
pub fn mul_div_down(a: u128, b: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(CoreError::DivisionByZero);
    }
    let prod = widen(a) * widen(b);
    narrow(prod / widen(d), "mul_div_down")
}

/// `ceil(a * b / d)`.
pub fn mul_div_up(a: u128, b: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(CoreError::DivisionByZero);
    }
    let prod = widen(a) * widen(b);
    let dd = widen(d);
    let floor = prod / dd;
    let rem = prod % dd;
    let result = if rem.is_zero() { floor } else { floor + U256::ONE };
    narrow(result, "mul_div_up")
}

/// `max(a, b) - min(a, b)` for unsigned operands.
pub fn abs_diff(a: u128, b: u128) -> u128 {
    a.max(b) - a.min(b)
}

/// `floor(x * 10_000 / base)`. Callers must guard `base == 0` themselves when
/// zero is a meaningful "no deviation" case rather than an error.
pub fn to_bps(x: u128, base: u128) -> Result<u64> {
    let bps = mul_div_down(x, BPS, base)?;
    u64::try_from(bps).map_err(|_| CoreError::Overflow("to_bps"))
}

/// Multiply a WAD-scaled value by a WAD-scaled factor, rounding down.
pub fn wad_mul_down(a: u128, b: u128) -> Result<u128> {
    mul_div_down(a, b, WAD)
}

/// Multiply a WAD-scaled value by a WAD-scaled factor, rounding up.
pub fn wad_mul_up(a: u128, b: u128) -> Result<u128> {
    mul_div_up(a, b, WAD)
}

/// Divide one WAD-scaled value by another, rounding down, returning a
/// WAD-scaled quotient.
pub fn wad_div_down(a: u128, b: u128) -> Result<u128> {
    mul_div_down(a, WAD, b)
}

/// Divide one WAD-scaled value by another, rounding up, returning a
/// WAD-scaled quotient.
pub fn wad_div_up(a: u128, b: u128) -> Result<u128> {
    mul_div_up(a, WAD, b)
}

/// Clamp `x` into `[lo, hi]`.
pub fn clamp_u128(x: u128, lo: u128, hi: u128) -> u128 {
    x.clamp(lo, hi)
}

/// Clamp a signed bps value into `[-max, max]`.
pub fn clamp_i64(x: i64, max: i64) -> i64 {
    x.clamp(-max, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_down_basic() {
        // 10 * 1.5 / 1 = 15, no rounding needed
        assert_eq!(mul_div_down(10, 15, 10).unwrap(), 15);
    }

    #[test]
    fn mul_div_down_rounds_toward_zero() {
        // 7 * 1 / 2 = 3.5 -> floors to 3
        assert_eq!(mul_div_down(7, 1, 2).unwrap(), 3);
    }

    #[test]
    fn mul_div_up_rounds_away_from_zero() {
        // 7 * 1 / 2 = 3.5 -> ceils to 4
        assert_eq!(mul_div_up(7, 1, 2).unwrap(), 4);
    }

    #[test]
    fn mul_div_up_exact_no_rounding() {
        assert_eq!(mul_div_up(10, 10, 5), mul_div_down(10, 10, 5));
    }

    #[test]
    fn mul_div_rejects_zero_denominator() {
        assert_eq!(mul_div_down(1, 1, 0), Err(CoreError::DivisionByZero));
        assert_eq!(mul_div_up(1, 1, 0), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn mul_div_down_handles_u128_max_without_overflow() {
        // Widening through U256 means this does not panic or truncate
        // incorrectly the way a native u128 multiply would.
        let huge = u128::MAX / 2;
        let result = mul_div_down(huge, 2, 2).unwrap();
        assert_eq!(result, huge);
    }

    #[test]
    fn abs_diff_is_symmetric() {
        assert_eq!(abs_diff(5, 9), 4);
        assert_eq!(abs_diff(9, 5), 4);
        assert_eq!(abs_diff(5, 5), 0);
    }

    #[test]
    fn to_bps_basic() {
        // 150 out of 10_000 is 150 bps
        assert_eq!(to_bps(150, 10_000).unwrap(), 150);
        // half of base is 5000 bps
        assert_eq!(to_bps(500, 1_000).unwrap(), 5_000);
    }

    #[test]
    fn wad_mul_div_roundtrip() {
        let a = 2 * WAD;
        let b = 3 * WAD;
        let prod = wad_mul_down(a, b).unwrap();
        assert_eq!(prod, 6 * WAD);
        let back = wad_div_down(prod, b).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn clamp_helpers() {
        assert_eq!(clamp_u128(5, 1, 3), 3);
        assert_eq!(clamp_u128(0, 1, 3), 1);
        assert_eq!(clamp_i64(-500, 300), -300);
        assert_eq!(clamp_i64(200, 300), 200);
    }
}
