use crate::fixedpoint::{Micros, Quantity};
use crate::validate::{ValidationError, MIN_PRICE, MIN_WEIGHT_MICROS};

/// One symbol of a weighted portfolio.
///
/// `weight_micros` is percentage points at 1e-6 scale (`60.0` →
/// `60_000_000`). `price` is the per-share price; `None` means "use the
/// configured default".
///
/// Fields are private: the only way to build an item is [`PortfolioItem::new`],
/// which enforces the per-field minimums. Downstream code can therefore divide
/// by the price without re-checking it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortfolioItem {
    symbol: String,
    weight_micros: i64,
    price: Option<Micros>,
}

impl PortfolioItem {
    pub fn new<S: Into<String>>(
        symbol: S,
        weight_micros: i64,
        price: Option<Micros>,
    ) -> Result<Self, ValidationError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if weight_micros < MIN_WEIGHT_MICROS {
            return Err(ValidationError::WeightBelowMinimum {
                symbol,
                weight_micros,
            });
        }
        if let Some(price) = price {
            if price < MIN_PRICE {
                return Err(ValidationError::PriceBelowMinimum { symbol, price });
            }
        }
        Ok(Self {
            symbol,
            weight_micros,
            price,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn weight_micros(&self) -> i64 {
        self.weight_micros
    }

    pub fn price(&self) -> Option<Micros> {
        self.price
    }
}

/// Result of allocating one portfolio item.
///
/// Invariant: `quantity == round(allocated / price, precision)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationLine {
    pub symbol: String,
    /// Whole cents.
    pub allocated: Micros,
    /// Explicit item price, or the configured default.
    pub price: Micros,
    pub quantity: Quantity,
}
