//! Monetary rounding
//!
//! All monetary outputs are rounded to 2 decimal places with half-up
//! rounding (ties round away from zero), the crate-wide rounding policy.

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;

/// Round a monetary amount to 2 decimal places, half-up
pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}
