//! Request and response types for osp-daemon endpoints that are not order
//! payloads (those live in `osp-schemas`).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    /// Hash of the effective layered config, if any layers were loaded.
    pub config_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors (400 / 500)
// ---------------------------------------------------------------------------

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable code, e.g. `WEIGHTS_DO_NOT_TOTAL_100`.
    pub code: String,
}
