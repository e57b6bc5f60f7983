//! osp-orders
//!
//! Order lifecycle on top of `osp-portfolio`:
//! - Boundary-checked requests and finalized orders
//! - Execution-date calendar (weekend roll, optional market holidays)
//! - Append-only order store (in-memory backend)
//! - `OrderService`: validate → allocate → stamp → persist

pub mod calendar;
mod error;
mod service;
pub mod store;
mod types;

pub use calendar::ExecutionCalendar;
pub use error::OrderError;
pub use service::OrderService;
pub use store::{InMemoryOrderStore, OrderStore};
pub use types::{Order, OrderRequest, OrderType};
