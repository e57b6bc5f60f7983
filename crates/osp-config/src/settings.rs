//! Typed settings read from the merged config tree, then overridden by
//! environment variables.
//!
//! Extraction only checks types. Range checks (precision ≤ 6, price > 0,
//! known calendar names) run when the values are turned into their owning
//! crates' types via [`Settings::allocator_config`] and [`Settings::calendar`].

use anyhow::{anyhow, bail, Context, Result};
use osp_orders::ExecutionCalendar;
use osp_portfolio::{AllocatorConfig, Micros};
use serde::Serialize;
use serde_json::Value;

pub const ENV_SHARE_DECIMAL_PLACES: &str = "SHARE_DECIMAL_PLACES";
pub const ENV_DEFAULT_STOCK_PRICE: &str = "DEFAULT_STOCK_PRICE";
pub const ENV_EXECUTION_CALENDAR: &str = "EXECUTION_CALENDAR";
pub const ENV_DAEMON_ADDR: &str = "OSP_DAEMON_ADDR";

pub const DEFAULT_DAEMON_ADDR: &str = "127.0.0.1:8899";

const DEFAULT_SHARE_DECIMAL_PLACES: u32 = 3;
const DEFAULT_STOCK_PRICE: f64 = 100.0;
const DEFAULT_CALENDAR_POLICY: &str = "weekends";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub share_decimal_places: u32,
    pub default_stock_price: f64,
    pub calendar_policy: String,
    pub daemon_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            share_decimal_places: DEFAULT_SHARE_DECIMAL_PLACES,
            default_stock_price: DEFAULT_STOCK_PRICE,
            calendar_policy: DEFAULT_CALENDAR_POLICY.to_string(),
            daemon_addr: DEFAULT_DAEMON_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Read known keys from a merged config tree. Missing keys keep defaults;
    /// present keys of the wrong type are errors.
    pub fn from_config_json(config: &Value) -> Result<Self> {
        let mut s = Settings::default();

        if let Some(v) = config.pointer("/allocation/share_decimal_places") {
            s.share_decimal_places = v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid("/allocation/share_decimal_places", v, "non-negative integer"))?;
        }
        if let Some(v) = config.pointer("/allocation/default_stock_price") {
            s.default_stock_price = v
                .as_f64()
                .ok_or_else(|| invalid("/allocation/default_stock_price", v, "number"))?;
        }
        if let Some(v) = config.pointer("/calendar/policy") {
            s.calendar_policy = v
                .as_str()
                .ok_or_else(|| invalid("/calendar/policy", v, "string"))?
                .to_string();
        }
        if let Some(v) = config.pointer("/daemon/addr") {
            s.daemon_addr = v
                .as_str()
                .ok_or_else(|| invalid("/daemon/addr", v, "string"))?
                .to_string();
        }

        Ok(s)
    }

    /// Apply environment overrides through `lookup` (usually `std::env::var`).
    /// Blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(raw) = get(ENV_SHARE_DECIMAL_PLACES) {
            self.share_decimal_places = raw
                .parse()
                .with_context(|| format!("CONFIG_INVALID_ENV {ENV_SHARE_DECIMAL_PLACES}={raw}"))?;
        }
        if let Some(raw) = get(ENV_DEFAULT_STOCK_PRICE) {
            let price: f64 = raw
                .parse()
                .with_context(|| format!("CONFIG_INVALID_ENV {ENV_DEFAULT_STOCK_PRICE}={raw}"))?;
            if !price.is_finite() {
                bail!("CONFIG_INVALID_ENV {ENV_DEFAULT_STOCK_PRICE}={raw}: must be finite");
            }
            self.default_stock_price = price;
        }
        if let Some(raw) = get(ENV_EXECUTION_CALENDAR) {
            self.calendar_policy = raw;
        }
        if let Some(raw) = get(ENV_DAEMON_ADDR) {
            self.daemon_addr = raw;
        }
        Ok(())
    }

    /// Validated allocator settings. Errors here are fatal at startup.
    pub fn allocator_config(&self) -> Result<AllocatorConfig> {
        let price = Micros::try_from_units(self.default_stock_price).map_err(|e| {
            anyhow!("CONFIG_INVALID_VALUE default_stock_price={}: {e}", self.default_stock_price)
        })?;
        AllocatorConfig::new(self.share_decimal_places, price).context("invalid allocator config")
    }

    pub fn calendar(&self) -> Result<ExecutionCalendar> {
        self.calendar_policy.parse().map_err(|e: String| anyhow!(e))
    }

    /// Config tree plus process environment.
    pub fn resolve(config: &Value) -> Result<Self> {
        let mut s = Self::from_config_json(config)?;
        s.apply_env_overrides(|k| std::env::var(k).ok())?;
        Ok(s)
    }
}

fn invalid(pointer: &str, got: &Value, expected: &str) -> anyhow::Error {
    anyhow!("CONFIG_INVALID_VALUE {pointer}: expected {expected}, got {got}")
}
