//! JSON wire shapes for orders.
//!
//! Field names are camelCase. Numbers travel as JSON numbers (`f64`) and are
//! converted to fixed point here, on the way in, and back on the way out.
//! Nothing past this crate sees an `f64`.

use osp_orders::{Order, OrderRequest, OrderType};
use osp_portfolio::{
    units_to_micros, AllocationLine, ConversionError, Micros, PortfolioItem, ValidationError,
    MICROS_SCALE, MIN_PRICE, MIN_TOTAL_AMOUNT, MIN_WEIGHT_MICROS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub order_type: String,
    pub total_amount: f64,
    pub portfolio: Vec<PortfolioItemBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItemBody {
    pub symbol: String,
    /// Percentage points, e.g. `60` or `33.33`.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl CreateOrderBody {
    /// Convert to a boundary-checked [`OrderRequest`].
    ///
    /// Checks run in field order: order type, total amount, then each item.
    /// The first failure wins. Minimums are compared against the number as
    /// sent, before conversion, so `0.0099999` is below one cent.
    pub fn into_request(self) -> Result<OrderRequest, ValidationError> {
        let order_type: OrderType = self.order_type.parse()?;
        if below(self.total_amount, MIN_TOTAL_AMOUNT) {
            return Err(ValidationError::AmountBelowMinimum {
                amount: Micros::new(truncated_micros(self.total_amount)),
            });
        }
        let total = Micros::try_from_units(self.total_amount)
            .map_err(|reason| invalid_number("totalAmount", reason))?;

        let portfolio = self
            .portfolio
            .into_iter()
            .enumerate()
            .map(|(idx, item)| item.into_item(idx))
            .collect::<Result<Vec<_>, _>>()?;

        OrderRequest::new(order_type, total, portfolio)
    }
}

impl PortfolioItemBody {
    fn into_item(self, idx: usize) -> Result<PortfolioItem, ValidationError> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if below(self.weight, Micros::new(MIN_WEIGHT_MICROS)) {
            return Err(ValidationError::WeightBelowMinimum {
                weight_micros: truncated_micros(self.weight),
                symbol: self.symbol,
            });
        }
        if let Some(price) = self.price.filter(|p| below(*p, MIN_PRICE)) {
            return Err(ValidationError::PriceBelowMinimum {
                price: Micros::new(truncated_micros(price)),
                symbol: self.symbol,
            });
        }

        // Percentage points and micros share the 1e6 scale.
        let weight_micros = units_to_micros(self.weight)
            .map_err(|reason| invalid_number(&format!("portfolio[{idx}].weight"), reason))?;
        let price = self
            .price
            .map(Micros::try_from_units)
            .transpose()
            .map_err(|reason| invalid_number(&format!("portfolio[{idx}].price"), reason))?;
        PortfolioItem::new(self.symbol, weight_micros, price)
    }
}

/// `NaN` is never below; conversion reports it.
fn below(value: f64, min: Micros) -> bool {
    value < min.to_units()
}

/// Error payload only; `as` truncates toward zero and saturates.
fn truncated_micros(value: f64) -> i64 {
    (value * MICROS_SCALE as f64) as i64
}

fn invalid_number(field: &str, reason: ConversionError) -> ValidationError {
    ValidationError::InvalidNumber {
        field: field.to_string(),
        reason,
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub order_type: String,
    pub total_amount: f64,
    /// `YYYY-MM-DD`
    pub execution_date: String,
    /// ISO-8601 UTC, millisecond precision
    pub created_at: String,
    pub breakdown: Vec<AllocationLineView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationLineView {
    pub symbol: String,
    pub allocated_amount: f64,
    pub price: f64,
    pub quantity: f64,
}

impl From<&Order> for OrderView {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            order_type: o.order_type.as_str().to_string(),
            total_amount: o.total_amount.to_units(),
            execution_date: o.execution_date_string(),
            created_at: o.created_at_string(),
            breakdown: o.breakdown.iter().map(AllocationLineView::from).collect(),
        }
    }
}

impl From<&AllocationLine> for AllocationLineView {
    fn from(l: &AllocationLine) -> Self {
        Self {
            symbol: l.symbol.clone(),
            allocated_amount: l.allocated.to_units(),
            price: l.price.to_units(),
            quantity: l.quantity.to_units(),
        }
    }
}
