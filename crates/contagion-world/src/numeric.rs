//! Float/integer conversions used by the spread rules.
//!
//! Resource amounts are whole units but the rules are expressed as rates.
//! Every conversion goes through this module so the lossy casts live in one
//! place. Float-to-integer conversions saturate: negative and `NaN` inputs
//! become 0 and values beyond `u64::MAX` become `u64::MAX`.

/// Widen an amount to `f64` for rate arithmetic.
#[allow(clippy::cast_precision_loss)]
pub const fn to_f64(amount: u64) -> f64 {
    amount as f64
}

/// Convert a non-negative float to a whole amount, truncating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn saturating_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value as u64
    }
}

/// `ceil`, saturated into `u64`.
pub fn ceil_u64(value: f64) -> u64 {
    saturating_u64(value.ceil())
}

/// `floor`, saturated into `u64`.
pub fn floor_u64(value: f64) -> u64 {
    saturating_u64(value.floor())
}

/// Round half away from zero, saturated into `u64`.
pub fn round_u64(value: f64) -> u64 {
    saturating_u64(value.round())
}

/// Convert an amount to a signed delta, saturating at `i64::MAX`.
pub fn to_i64(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_saturate() {
        assert_eq!(ceil_u64(10.1), 11);
        assert_eq!(floor_u64(10.9), 10);
        assert_eq!(round_u64(2.5), 3);
        assert_eq!(ceil_u64(-3.0), 0);
        assert_eq!(ceil_u64(f64::NAN), 0);
        assert_eq!(ceil_u64(f64::INFINITY), u64::MAX);
        assert_eq!(to_i64(u64::MAX), i64::MAX);
    }
}
