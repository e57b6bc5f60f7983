//! Input rules for portfolios and order amounts.
//!
//! Two layers:
//! - Per-field minimums are checked when a [`crate::PortfolioItem`] is
//!   constructed (and by [`check_total_amount`] for the order amount), so a
//!   zero or negative price can never reach the allocator.
//! - The whole-portfolio rule (weights total 100) is [`validate_weights`],
//!   run by the order service before allocation.

use crate::fixedpoint::Micros;
use crate::types::PortfolioItem;
use crate::wire::ConversionError;

/// 100 percentage points in micro-percent.
pub const FULL_WEIGHT_MICROS: i64 = 100 * crate::MICROS_SCALE;

/// Accepted deviation of the weight sum from 100: 0.0001 percentage points.
pub const WEIGHT_TOLERANCE_MICROS: i64 = 100;

/// Smallest accepted weight: 0.0001 percentage points.
pub const MIN_WEIGHT_MICROS: i64 = 100;

/// Smallest accepted per-share price: 0.0001.
pub const MIN_PRICE: Micros = Micros::new(100);

/// Smallest accepted order amount: one cent.
pub const MIN_TOTAL_AMOUNT: Micros = Micros::new(crate::CENT_MICROS);

// ─── Error ───────────────────────────────────────────────────────────────────

/// A request broke a business rule. Nothing was allocated or stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Weights summed to something outside `100 ± 0.0001`.
    WeightsDoNotTotal100 { total_micros: i64 },
    /// The portfolio has no items.
    EmptyPortfolio,
    /// A portfolio item has a blank symbol.
    EmptySymbol,
    /// A weight is below 0.0001 (this includes zero and negatives).
    WeightBelowMinimum { symbol: String, weight_micros: i64 },
    /// A price is below 0.0001 (this includes zero and negatives).
    PriceBelowMinimum { symbol: String, price: Micros },
    /// The order amount is below 0.01.
    AmountBelowMinimum { amount: Micros },
    /// Order type was not `BUY` or `SELL`.
    UnsupportedOrderType { value: String },
    /// A numeric field could not be represented as fixed point.
    InvalidNumber { field: String, reason: ConversionError },
}

impl ValidationError {
    /// Stable machine-readable code, surfaced in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WeightsDoNotTotal100 { .. } => "WEIGHTS_DO_NOT_TOTAL_100",
            Self::EmptyPortfolio => "EMPTY_PORTFOLIO",
            Self::EmptySymbol => "EMPTY_SYMBOL",
            Self::WeightBelowMinimum { .. } => "WEIGHT_BELOW_MINIMUM",
            Self::PriceBelowMinimum { .. } => "PRICE_BELOW_MINIMUM",
            Self::AmountBelowMinimum { .. } => "AMOUNT_BELOW_MINIMUM",
            Self::UnsupportedOrderType { .. } => "UNSUPPORTED_ORDER_TYPE",
            Self::InvalidNumber { .. } => "INVALID_NUMBER",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightsDoNotTotal100 { total_micros } => write!(
                f,
                "portfolio weights must total 100 (got {})",
                Micros::new(*total_micros)
            ),
            Self::EmptyPortfolio => write!(f, "portfolio must contain at least one item"),
            Self::EmptySymbol => write!(f, "portfolio symbol must not be empty"),
            Self::WeightBelowMinimum {
                symbol,
                weight_micros,
            } => write!(
                f,
                "weight for '{symbol}' must be at least 0.0001 (got {})",
                Micros::new(*weight_micros)
            ),
            Self::PriceBelowMinimum { symbol, price } => {
                write!(f, "price for '{symbol}' must be at least 0.0001 (got {price})")
            }
            Self::AmountBelowMinimum { amount } => {
                write!(f, "total amount must be at least 0.01 (got {amount})")
            }
            Self::UnsupportedOrderType { value } => {
                write!(f, "unsupported order type '{value}' (expected BUY or SELL)")
            }
            Self::InvalidNumber { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ValidationError {}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Fails unless the item weights sum to 100 within
/// [`WEIGHT_TOLERANCE_MICROS`]. Pure; no side effects.
pub fn validate_weights(items: &[PortfolioItem]) -> Result<(), ValidationError> {
    let total_micros: i64 = items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.weight_micros()));

    if (total_micros.saturating_sub(FULL_WEIGHT_MICROS)).abs() > WEIGHT_TOLERANCE_MICROS {
        return Err(ValidationError::WeightsDoNotTotal100 { total_micros });
    }
    Ok(())
}

/// Order amount must be at least [`MIN_TOTAL_AMOUNT`].
pub fn check_total_amount(amount: Micros) -> Result<(), ValidationError> {
    if amount < MIN_TOTAL_AMOUNT {
        return Err(ValidationError::AmountBelowMinimum { amount });
    }
    Ok(())
}
