//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Wrap a signed offset into `0..len`, returning 0 for an empty cycle.
#[must_use]
pub fn cycle_index(value: i64, len: usize) -> usize {
    let Some(modulus) = cast::<usize, i64>(len).filter(|m| *m > 0) else {
        return 0;
    };
    cast::<i64, usize>(value.rem_euclid(modulus)).unwrap_or(0)
}

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert i32 to f64 for calendar arithmetic.
#[must_use]
pub fn i32_to_f64(value: i32) -> f64 {
    f64::from(value)
}

/// Express a probability or multiplier delta as a percentage.
#[must_use]
pub fn as_percent(value: f64) -> f64 {
    value * 100.0
}
