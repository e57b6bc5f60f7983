//! `osp split`: run one request through a fresh order service.
//!
//! The store is in-memory and discarded on exit; this command is for
//! previewing a split under a given config.

use std::fs;

use anyhow::{anyhow, Context, Result};
use osp_config::{report_unused_keys, Settings, UnusedKeyPolicy};
use osp_orders::{InMemoryOrderStore, OrderService};
use osp_portfolio::Allocator;
use osp_schemas::{CreateOrderBody, OrderView};
use tracing::info;

pub fn run_split(request_path: &str, config_paths: &[String], strict: bool) -> Result<OrderView> {
    let loaded = super::load_config(config_paths)?;
    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    report_unused_keys(&loaded.config_json, policy)?;

    let settings = Settings::resolve(&loaded.config_json)?;
    let service = OrderService::new(
        Allocator::new(settings.allocator_config()?),
        settings.calendar()?,
        InMemoryOrderStore::new(),
    );
    info!(config_hash = %loaded.config_hash, "split config loaded");

    let raw = fs::read_to_string(request_path)
        .with_context(|| format!("failed to read request file: {request_path}"))?;
    let body: CreateOrderBody = serde_json::from_str(&raw)
        .with_context(|| format!("request file is not a valid order body: {request_path}"))?;

    let request = body
        .into_request()
        .map_err(|e| anyhow!("{}: {e}", e.code()))?;
    let order = service
        .create_order(request)
        .map_err(|e| anyhow!("{}: {e}", e.code()))?;

    Ok(OrderView::from(&order))
}
