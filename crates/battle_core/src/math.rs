//! Fixed-point math utilities for deterministic unit scoring.
//!
//! Ratios that decide ordering (unit efficiency) use fixed-point
//! arithmetic so the same roster sorts identically on every platform.

use fixed::types::I32F32;

/// Fixed-point number type for all scoring math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Divide two integers in fixed-point.
///
/// Returns zero when `denominator` is zero.
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> Fixed {
    if denominator == 0 {
        return Fixed::ZERO;
    }
    // I32F32 tops out at i32::MAX; larger stats saturate.
    Fixed::saturating_from_num(numerator) / Fixed::saturating_from_num(denominator)
}
