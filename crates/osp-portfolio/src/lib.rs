//! osp-portfolio
//!
//! Weighted order splitting:
//! - Weight validation (weights must total 100 ± 0.0001)
//! - Exact cent allocation with the last item taking the rounding residual
//! - Share quantities rounded to a configured precision
//! - Fixed-point money (`Micros`) and quantities (`Quantity`); `f64` only at
//!   the wire boundary
//! - Pure deterministic logic (no IO, no time, no storage)

mod fixedpoint;
mod types;
mod wire;

pub mod allocator;
pub mod validate;

pub use allocator::{
    Allocator, AllocatorConfig, ConfigError, DEFAULT_SHARE_DECIMAL_PLACES,
    DEFAULT_STOCK_PRICE,
};
pub use fixedpoint::{Micros, Quantity, MAX_SHARE_DECIMAL_PLACES};
pub use types::{AllocationLine, PortfolioItem};
pub use validate::{
    check_total_amount, validate_weights, ValidationError, FULL_WEIGHT_MICROS, MIN_PRICE,
    MIN_TOTAL_AMOUNT, MIN_WEIGHT_MICROS, WEIGHT_TOLERANCE_MICROS,
};
pub use wire::{micros_to_units, units_to_micros, ConversionError};

/// Fixed-point scale for money, prices, weights and quantities: 1e-6.
pub const MICROS_SCALE: i64 = 1_000_000;

/// One cent in micros.
pub const CENT_MICROS: i64 = 10_000;
