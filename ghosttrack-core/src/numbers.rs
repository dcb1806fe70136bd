//! Numeric conversion helpers centralizing safe numeric casts and percentage rounding.

use num_traits::cast::cast;

/// Convert u32 to f64 in a single location.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Clamp an i64 into the u32 range. Negative values become 0.
#[must_use]
pub fn clamp_i64_to_u32(value: i64) -> u32 {
    if value <= 0 {
        return 0;
    }
    cast::<i64, u32>(value).unwrap_or(u32::MAX)
}

/// Clamp an i64 into the i32 range.
#[must_use]
pub fn clamp_i64_to_i32(value: i64) -> i32 {
    let min = i64::from(i32::MIN);
    let max = i64::from(i32::MAX);
    cast::<i64, i32>(value.clamp(min, max)).unwrap_or(0)
}

/// Round a f64 to one decimal place, halves away from zero, returning 0.0 for non-finite values.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// Share of `part` in `whole` as a percentage rounded to one decimal.
///
/// A zero `whole` yields 0.0 rather than NaN.
#[must_use]
pub fn percent_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(u32_to_f64(part) / u32_to_f64(whole) * 100.0)
}
