//! Bounds on prices and sizes.
//!
//! ## Overview
//!
//! `Decimal` carries a 96-bit mantissa. Addition rounds silently once a
//! result needs more digits than that, and panics on overflow. The book keeps
//! running volume totals, so every value it accepts is bounded up front:
//!
//! - at most [`MAX_SCALE`] decimal places (8, the same precision as a
//!   fixed-point value scaled by 10^8)
//! - at most [`MAX_VALUE`] in magnitude, for single values and for the
//!   total resting volume of a side
//!
//! Any value within both bounds fits the mantissa with room to spare
//! (10^18 * 10^8 < 2^96), so sums and differences of accepted values are
//! always exact and never overflow.
//!
//! ## Examples
//!
//! ```
//! use limit_book::types::quantity::{self, MAX_SCALE};
//! use rust_decimal::Decimal;
//!
//! assert!(quantity::validate("size", Decimal::new(150_000_000, MAX_SCALE)).is_ok());
//! assert!(quantity::validate("size", Decimal::new(1, MAX_SCALE + 1)).is_err());
//! assert!(quantity::validate("size", Decimal::MAX).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Maximum number of decimal places in a price or size
pub const MAX_SCALE: u32 = 8;

/// Largest accepted price, size, or resting volume of one side (10^18)
pub const MAX_VALUE: u64 = 1_000_000_000_000_000_000;

/// [`MAX_VALUE`] as a `Decimal`
#[inline]
pub fn max_value() -> Decimal {
    Decimal::from(MAX_VALUE)
}

/// Check that `value` is positive and within both bounds.
///
/// # Arguments
///
/// * `what` - Name used in the error message ("size", "price")
/// * `value` - Value to check
///
/// # Errors
///
/// `Error::InvalidOrder` naming the violated bound.
pub fn validate(what: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::InvalidOrder(format!("{what} must be positive, got {value}")));
    }
    if value.scale() > MAX_SCALE {
        return Err(Error::InvalidOrder(format!(
            "{what} has more than {MAX_SCALE} decimal places: {value}"
        )));
    }
    if value > max_value() {
        return Err(Error::InvalidOrder(format!("{what} exceeds {MAX_VALUE}: {value}")));
    }
    Ok(())
}

/// `a + b`, or `None` if the sum exceeds [`MAX_VALUE`]
pub fn checked_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b).filter(|sum| *sum <= max_value())
}
