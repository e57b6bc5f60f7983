//! `f64` ↔ integer-micros conversion at the JSON boundary.
//!
//! Amounts, prices and weights are `i64` micros everywhere inside the
//! workspace. Floating point only exists on the wire:
//!
//! | Direction           | Function             |
//! |---------------------|----------------------|
//! | JSON body → domain  | [`units_to_micros`]  |
//! | domain → JSON body  | [`micros_to_units`]  |
//!
//! Inbound conversion snaps to the nearest micro so that `33.33` (stored in
//! binary as `33.329999…`) becomes exactly `33_330_000`. Only binary
//! representation noise is absorbed: a value with a seventh significant
//! decimal digit (`1.23456789`) is rejected, never rounded.

use crate::fixedpoint::{Micros, Quantity};
use crate::MICROS_SCALE;

/// Errors returned by [`units_to_micros`] when the input is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    /// Input was `NaN` or infinite.
    NotFinite,
    /// Input would overflow `i64` after scaling by 1e6.
    OutOfRange,
    /// Input carries more than 6 decimal places.
    TooPrecise,
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::NotFinite => write!(f, "non-finite number (NaN or Inf)"),
            ConversionError::OutOfRange => write!(f, "number out of range after scaling to micros"),
            ConversionError::TooPrecise => write!(f, "number has more than 6 decimal places"),
        }
    }
}

impl std::error::Error for ConversionError {}

/// Convert a decimal value received on the wire into integer micros.
///
/// Rejects `NaN`, infinities, values whose scaled magnitude does not fit in
/// `i64`, and values that are not a whole number of micros.
pub fn units_to_micros(value: f64) -> Result<i64, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::NotFinite);
    }
    let raw = value * MICROS_SCALE as f64;
    let scaled = raw.round();
    // `as` saturates silently; reject instead.
    if scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
        return Err(ConversionError::OutOfRange);
    }
    if (raw - scaled).abs() > representation_slack(raw) {
        return Err(ConversionError::TooPrecise);
    }
    Ok(scaled as i64)
}

/// Largest distance from a whole micro that is still binary noise: a few
/// ulps of the scaled value (parse error plus the multiply).
fn representation_slack(raw: f64) -> f64 {
    raw.abs().max(1.0) * 16.0 * f64::EPSILON
}

/// Convert integer micros to `f64` for serialization.
///
/// Exact for every value with at most ~15 significant decimal digits, which
/// covers any realistic amount, price or quantity.
pub fn micros_to_units(micros: i64) -> f64 {
    micros as f64 / MICROS_SCALE as f64
}

impl Micros {
    /// Wire-boundary constructor: decimal units → micros.
    pub fn try_from_units(value: f64) -> Result<Micros, ConversionError> {
        units_to_micros(value).map(Micros::new)
    }

    /// Wire-boundary accessor: micros → decimal units.
    pub fn to_units(self) -> f64 {
        micros_to_units(self.raw())
    }
}

impl Quantity {
    /// Wire-boundary accessor: share-micros → decimal shares.
    pub fn to_units(self) -> f64 {
        micros_to_units(self.raw())
    }
}
