//! osp-portfolio: allocator
//!
//! Splits a total amount across an ordered, weight-validated portfolio.
//!
//! Responsibilities (pure, no IO, no clock):
//! - Every item except the last receives `round2(total × weight / 100)`.
//! - The last item receives whatever is left: `round2(total − Σ previous)`.
//!   It is never recomputed from its own weight, so the breakdown always sums
//!   to the (cent-rounded) total. The residual goes to the final item in input
//!   order regardless of portfolio size or which item carries the most weight.
//! - Each line's quantity is `round(allocated / price, share_decimal_places)`.
//!
//! Weight validation is a separate step ([`crate::validate_weights`]); the
//! allocator trusts its input and cannot fail.

use crate::fixedpoint::{
    div_round_half_away, saturate_i64, Micros, Quantity, MAX_SHARE_DECIMAL_PLACES,
};
use crate::types::{AllocationLine, PortfolioItem};
use crate::CENT_MICROS;

/// Default share precision (decimal places).
pub const DEFAULT_SHARE_DECIMAL_PLACES: u32 = 3;

/// Default per-share price used when an item carries none: 100.00.
pub const DEFAULT_STOCK_PRICE: Micros = Micros::from_units(100);

/// Divisor turning `total_micros × weight_micros` into whole cents:
/// 1e6 (weight scale) × 100 (percent) × 1e4 (micros per cent).
const WEIGHTED_TO_CENTS: i128 = crate::MICROS_SCALE as i128 * 100 * CENT_MICROS as i128;

// ─── ConfigError ─────────────────────────────────────────────────────────────

/// Invalid allocator settings. Raised once at startup; not a per-request error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Share precision above [`MAX_SHARE_DECIMAL_PLACES`].
    SharePrecisionOutOfRange { places: u32 },
    /// Default price is zero or negative.
    NonPositiveDefaultPrice { price: Micros },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SharePrecisionOutOfRange { places } => write!(
                f,
                "SHARE_DECIMAL_PLACES must be between 0 and {MAX_SHARE_DECIMAL_PLACES} (got {places})"
            ),
            Self::NonPositiveDefaultPrice { price } => {
                write!(f, "DEFAULT_STOCK_PRICE must be > 0 (got {price})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ─── AllocatorConfig ─────────────────────────────────────────────────────────

/// Immutable allocator settings, validated at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    share_decimal_places: u32,
    default_price: Micros,
}

impl AllocatorConfig {
    pub fn new(share_decimal_places: u32, default_price: Micros) -> Result<Self, ConfigError> {
        if share_decimal_places > MAX_SHARE_DECIMAL_PLACES {
            return Err(ConfigError::SharePrecisionOutOfRange {
                places: share_decimal_places,
            });
        }
        if !default_price.is_positive() {
            return Err(ConfigError::NonPositiveDefaultPrice {
                price: default_price,
            });
        }
        Ok(Self {
            share_decimal_places,
            default_price,
        })
    }

    pub fn share_decimal_places(&self) -> u32 {
        self.share_decimal_places
    }

    pub fn default_price(&self) -> Micros {
        self.default_price
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            share_decimal_places: DEFAULT_SHARE_DECIMAL_PLACES,
            default_price: DEFAULT_STOCK_PRICE,
        }
    }
}

// ─── Allocator ───────────────────────────────────────────────────────────────

/// Weighted amount splitter. See the module docs for the algorithm.
#[derive(Clone, Debug, Default)]
pub struct Allocator {
    config: AllocatorConfig,
}

impl Allocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Split `total` across `items`, one line per item, in input order.
    ///
    /// `items` should already have passed [`crate::validate_weights`]; an
    /// empty slice yields an empty breakdown.
    pub fn allocate(&self, total: Micros, items: &[PortfolioItem]) -> Vec<AllocationLine> {
        let last = items.len().saturating_sub(1);
        let mut remaining = total;
        let mut lines = Vec::with_capacity(items.len());

        for (idx, item) in items.iter().enumerate() {
            let allocated = if idx == last {
                remaining.round_to_cents()
            } else {
                let amount = weighted_cents(total, item.weight_micros());
                remaining -= amount;
                amount
            };

            let price = item.price().unwrap_or(self.config.default_price);
            let quantity =
                Quantity::from_allocation(allocated, price, self.config.share_decimal_places);

            lines.push(AllocationLine {
                symbol: item.symbol().to_string(),
                allocated,
                price,
                quantity,
            });
        }

        lines
    }
}

/// `round2(total × weight / 100)` computed exactly in integers.
fn weighted_cents(total: Micros, weight_micros: i64) -> Micros {
    let cents = div_round_half_away(total.raw() as i128 * weight_micros as i128, WEIGHTED_TO_CENTS);
    Micros::new(saturate_i64(cents * CENT_MICROS as i128))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PCT: i64 = crate::MICROS_SCALE;

    fn item(sym: &str, weight_micros: i64) -> PortfolioItem {
        PortfolioItem::new(sym, weight_micros, None).unwrap()
    }

    fn priced(sym: &str, weight_micros: i64, units: i64) -> PortfolioItem {
        PortfolioItem::new(sym, weight_micros, Some(Micros::from_units(units))).unwrap()
    }

    fn total(lines: &[AllocationLine]) -> Micros {
        lines.iter().map(|l| l.allocated).sum()
    }

    // ── Config ───────────────────────────────────────────────────────────────

    #[test]
    fn default_config_is_three_places_at_one_hundred() {
        let c = AllocatorConfig::default();
        assert_eq!(c.share_decimal_places(), 3);
        assert_eq!(c.default_price(), Micros::from_units(100));
    }

    #[test]
    fn config_rejects_precision_above_six() {
        assert_eq!(
            AllocatorConfig::new(7, DEFAULT_STOCK_PRICE).unwrap_err(),
            ConfigError::SharePrecisionOutOfRange { places: 7 }
        );
        assert!(AllocatorConfig::new(6, DEFAULT_STOCK_PRICE).is_ok());
        assert!(AllocatorConfig::new(0, DEFAULT_STOCK_PRICE).is_ok());
    }

    #[test]
    fn config_rejects_non_positive_default_price() {
        assert_eq!(
            AllocatorConfig::new(3, Micros::ZERO).unwrap_err(),
            ConfigError::NonPositiveDefaultPrice { price: Micros::ZERO }
        );
        assert!(AllocatorConfig::new(3, Micros::new(-5)).is_err());
    }

    // ── Splitting ────────────────────────────────────────────────────────────

    #[test]
    fn sixty_forty_uses_default_price() {
        let a = Allocator::default();
        let lines = a.allocate(
            Micros::from_units(100),
            &[item("AAPL", 60 * PCT), item("TSLA", 40 * PCT)],
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].symbol, "AAPL");
        assert_eq!(lines[0].allocated, Micros::from_units(60));
        assert_eq!(lines[0].price, Micros::from_units(100));
        assert_eq!(lines[0].quantity, Quantity::new(600_000));
        assert_eq!(lines[1].symbol, "TSLA");
        assert_eq!(lines[1].allocated, Micros::from_units(40));
        assert_eq!(lines[1].quantity, Quantity::new(400_000));
    }

    #[test]
    fn explicit_price_overrides_default() {
        let a = Allocator::default();
        let lines = a.allocate(
            Micros::from_units(100),
            &[priced("AAPL", 50 * PCT, 200), item("TSLA", 50 * PCT)],
        );
        assert_eq!(lines[0].price, Micros::from_units(200));
        assert_eq!(lines[0].quantity, Quantity::new(250_000));
        assert_eq!(lines[1].price, DEFAULT_STOCK_PRICE);
    }

    #[test]
    fn last_item_absorbs_residual() {
        // 100 / 3 three ways: 33.33 + 33.33 + 33.34
        let a = Allocator::default();
        let third = 33_333_333;
        let lines = a.allocate(
            Micros::from_units(100),
            &[item("A", third), item("B", third), item("C", third + 1)],
        );
        assert_eq!(lines[0].allocated, Micros::new(33_330_000));
        assert_eq!(lines[1].allocated, Micros::new(33_330_000));
        assert_eq!(lines[2].allocated, Micros::new(33_340_000));
        assert_eq!(total(&lines), Micros::from_units(100));
    }

    #[test]
    fn residual_goes_to_last_not_largest() {
        let a = Allocator::default();
        let lines = a.allocate(
            Micros::new(1_010_000), // 1.01
            &[item("BIG", 50 * PCT), item("SMALL", 50 * PCT)],
        );
        // 1.01 × 50% = 0.505 → 0.51 for the first; last gets 0.50.
        assert_eq!(lines[0].allocated, Micros::new(510_000));
        assert_eq!(lines[1].allocated, Micros::new(500_000));
        assert_eq!(total(&lines), Micros::new(1_010_000));
    }

    #[test]
    fn single_item_takes_everything() {
        let a = Allocator::default();
        let lines = a.allocate(Micros::new(123_450_000), &[priced("AAPL", 100 * PCT, 3)]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].allocated, Micros::new(123_450_000));
        // 123.45 / 3 = 41.15
        assert_eq!(lines[0].quantity, Quantity::new(41_150_000));
    }

    #[test]
    fn sub_cent_total_is_rounded_on_last_line() {
        let a = Allocator::default();
        let lines = a.allocate(Micros::new(100_004_000), &[item("AAPL", 100 * PCT)]);
        assert_eq!(lines[0].allocated, Micros::from_units(100));
    }

    #[test]
    fn empty_portfolio_yields_empty_breakdown() {
        let a = Allocator::default();
        assert!(a.allocate(Micros::from_units(100), &[]).is_empty());
    }

    #[test]
    fn precision_zero_gives_whole_shares() {
        let a = Allocator::new(AllocatorConfig::new(0, DEFAULT_STOCK_PRICE).unwrap());
        let lines = a.allocate(Micros::from_units(1_000), &[priced("AAPL", 100 * PCT, 300)]);
        // 1000 / 300 = 3.33 → 3
        assert_eq!(lines[0].quantity, Quantity::new(3_000_000));
    }

    #[test]
    fn many_items_keep_order_and_sum() {
        let a = Allocator::default();
        let syms = ["A", "B", "C", "D", "E", "F", "G"];
        // 7 × 14.285714 = 99.999998, last topped up to stay within tolerance
        let mut items: Vec<PortfolioItem> =
            syms[..6].iter().map(|s| item(s, 14_285_714)).collect();
        items.push(item("G", 100 * PCT - 6 * 14_285_714));

        let amount = Micros::new(999_990_000); // 999.99
        let lines = a.allocate(amount, &items);

        let out: Vec<&str> = lines.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(out, syms);
        assert_eq!(total(&lines), amount);
        assert!(lines.iter().all(|l| l.allocated.is_whole_cents()));
    }
}
