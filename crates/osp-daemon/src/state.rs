//! Shared runtime state for osp-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The order service
//! synchronizes internally, so the state itself holds no locks.

use std::sync::Arc;

use anyhow::Result;
use osp_config::Settings;
use osp_orders::{ExecutionCalendar, InMemoryOrderStore, OrderService};
use osp_portfolio::Allocator;

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub orders: Arc<OrderService<InMemoryOrderStore>>,
    /// Hash of the config the daemon booted with.
    pub config_hash: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Default allocator, weekend calendar, empty store, wall clock.
    pub fn new() -> Self {
        Self::with_service(OrderService::new(
            Allocator::default(),
            ExecutionCalendar::default(),
            InMemoryOrderStore::new(),
        ))
    }

    pub fn with_service(service: OrderService<InMemoryOrderStore>) -> Self {
        Self {
            build: BuildInfo {
                service: "osp-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            orders: Arc::new(service),
            config_hash: None,
        }
    }

    /// Build from resolved settings. Invalid allocator or calendar settings
    /// are returned as errors so `main` can refuse to start.
    pub fn from_settings(settings: &Settings, config_hash: Option<String>) -> Result<Self> {
        let allocator = Allocator::new(settings.allocator_config()?);
        let calendar = settings.calendar()?;
        let mut st = Self::with_service(OrderService::new(
            allocator,
            calendar,
            InMemoryOrderStore::new(),
        ));
        st.config_hash = config_hash;
        Ok(st)
    }
}
