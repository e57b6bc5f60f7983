//! Command handler modules for osp.
//!
//! Shared helpers live here; command-specific logic lives in submodules.

pub mod split;

use anyhow::Result;
use osp_config::{load_layered_yaml, LoadedConfig};

/// Load layered config, or the empty config when no paths were given.
pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    if paths.is_empty() {
        return LoadedConfig::empty();
    }
    let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    load_layered_yaml(&refs)
}
