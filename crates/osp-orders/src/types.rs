use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use osp_portfolio::{check_total_amount, AllocationLine, Micros, PortfolioItem, ValidationError};
use uuid::Uuid;

/// BUY or SELL.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
        }
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    /// Exact, upper-case match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(OrderType::Buy),
            "SELL" => Ok(OrderType::Sell),
            other => Err(ValidationError::UnsupportedOrderType {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boundary-checked order request.
///
/// Built only through [`OrderRequest::new`], which enforces the amount minimum
/// and a non-empty portfolio. Items carry their own per-field checks. Whether
/// the weights total 100 is decided later by the order service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderRequest {
    order_type: OrderType,
    total_amount: Micros,
    portfolio: Vec<PortfolioItem>,
}

impl OrderRequest {
    pub fn new(
        order_type: OrderType,
        total_amount: Micros,
        portfolio: Vec<PortfolioItem>,
    ) -> Result<Self, ValidationError> {
        check_total_amount(total_amount)?;
        if portfolio.is_empty() {
            return Err(ValidationError::EmptyPortfolio);
        }
        Ok(Self {
            order_type,
            total_amount,
            portfolio,
        })
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn total_amount(&self) -> Micros {
        self.total_amount
    }

    pub fn portfolio(&self) -> &[PortfolioItem] {
        &self.portfolio
    }
}

/// A finalized order. Immutable once created by the order service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub order_type: OrderType,
    pub total_amount: Micros,
    pub execution_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// One line per portfolio item, in request order.
    pub breakdown: Vec<AllocationLine>,
}

impl Order {
    /// Σ allocated over the breakdown.
    pub fn allocated_total(&self) -> Micros {
        self.breakdown.iter().map(|l| l.allocated).sum()
    }

    /// `YYYY-MM-DD`.
    pub fn execution_date_string(&self) -> String {
        self.execution_date.format("%Y-%m-%d").to_string()
    }

    /// ISO-8601 UTC with millisecond precision, e.g. `2024-01-08T15:00:00.000Z`.
    pub fn created_at_string(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
