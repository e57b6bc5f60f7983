//! Order creation pipeline.
//!
//! `create_order` runs, in order:
//! 1. weight validation (rejects before anything is computed or stored)
//! 2. allocation (last item takes the residual)
//! 3. id + execution date + creation timestamp
//! 4. append to the store
//!
//! A single clock reading feeds both the execution date and `created_at`, so
//! the two can never straddle midnight.

use chrono::{DateTime, Utc};
use osp_portfolio::{validate_weights, Allocator};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calendar::ExecutionCalendar;
use crate::error::OrderError;
use crate::store::OrderStore;
use crate::types::{Order, OrderRequest};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct OrderService<S> {
    allocator: Allocator,
    calendar: ExecutionCalendar,
    store: S,
    clock: Clock,
}

impl<S: OrderStore> OrderService<S> {
    /// Service reading wall-clock UTC time.
    pub fn new(allocator: Allocator, calendar: ExecutionCalendar, store: S) -> Self {
        Self {
            allocator,
            calendar,
            store,
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the clock. Tests use this to pin "now".
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn calendar(&self) -> ExecutionCalendar {
        self.calendar
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, split, stamp and persist one order.
    ///
    /// On a validation failure nothing is stored.
    pub fn create_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        if let Err(e) = validate_weights(request.portfolio()) {
            warn!(code = e.code(), error = %e, "order rejected");
            return Err(e.into());
        }

        let breakdown = self
            .allocator
            .allocate(request.total_amount(), request.portfolio());

        let now = (self.clock)();
        let order = Order {
            id: Uuid::new_v4(),
            order_type: request.order_type(),
            total_amount: request.total_amount(),
            execution_date: self.calendar.execution_date(now),
            created_at: now,
            breakdown,
        };

        self.store
            .save(order.clone())
            .map_err(OrderError::Storage)?;

        info!(
            order_id = %order.id,
            order_type = order.order_type.as_str(),
            total = %order.total_amount,
            lines = order.breakdown.len(),
            execution_date = %order.execution_date,
            "order created"
        );
        Ok(order)
    }

    /// Every stored order, oldest first.
    pub fn get_all_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.store.find_all().map_err(OrderError::Storage)
    }
}
