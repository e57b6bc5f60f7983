//! Unused-key guard.
//!
//! "Consumed pointers" are JSON Pointer prefixes. A leaf whose pointer falls
//! under any consumed prefix is considered read; every other leaf is unused.
//! Callers choose whether unused keys are a warning or an error.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Every pointer [`crate::Settings::from_config_json`] reads.
///
/// Must match what the code actually reads; add a pointer here in the same
/// change that starts reading it.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/allocation/share_decimal_places",
    "/allocation/default_stock_price",
    "/calendar/policy",
    "/daemon/addr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Produce an unused-key report for `config_json`.
///
/// `Warn` always returns the report (and logs each unused key); `Fail`
/// returns `CONFIG_UNUSED_KEYS` when any leaf is unused.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = CONSUMED_POINTERS
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    match policy {
        UnusedKeyPolicy::Fail if !report.is_clean() => bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. \
             Remove them or fix the spelling. First few: {}",
            report.unused_leaf_pointers.len(),
            preview_list(&report.unused_leaf_pointers, 12)
        ),
        UnusedKeyPolicy::Warn => {
            for key in &report.unused_leaf_pointers {
                tracing::warn!(key = %key, "unused config key");
            }
        }
        UnusedKeyPolicy::Fail => {}
    }

    Ok(report)
}

/// Leading "/" required, no trailing "/" unless the pointer is just "/".
fn normalize_pointer(p: &str) -> String {
    let trimmed = p.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc". "/" covers everything.
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    prefix == "/"
        || leaf == prefix
        || leaf
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Pointers of every scalar (non-object, non-array) value. A scalar root is
/// reported as "/".
fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    let children: Vec<(String, &Value)> = match v {
        Value::Object(map) => map
            .iter()
            .map(|(k, child)| (escape_pointer_token(k), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, child)| (i.to_string(), child))
            .collect(),
        _ => {
            out.push(if prefix.is_empty() { "/" } else { prefix }.to_string());
            return;
        }
    };
    for (token, child) in children {
        collect_leaf_pointers(child, &format!("{prefix}/{token}"), out);
    }
}

/// RFC 6901 token escaping.
fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).collect::<Vec<_>>();
    format!("{:?}", take)
}
