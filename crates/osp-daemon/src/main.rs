//! osp-daemon entry point.
//!
//! Sets up tracing, loads config, builds the shared state, wires middleware
//! and starts the HTTP server. Route handlers live in `routes.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use osp_config::{load_layered_yaml, report_unused_keys, LoadedConfig, Settings, UnusedKeyPolicy};
use osp_daemon::{routes, state};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// Comma-separated list of YAML layers, base first.
const ENV_CONFIG_PATHS: &str = "OSP_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let loaded = load_config()?;
    report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    let settings = Settings::resolve(&loaded.config_json)?;

    // Bad precision / price / calendar must stop the process here.
    let shared = Arc::new(
        state::AppState::from_settings(&settings, Some(loaded.config_hash.clone()))
            .context("refusing to start with invalid configuration")?,
    );
    info!(
        config_hash = %loaded.config_hash,
        share_decimal_places = settings.share_decimal_places,
        default_stock_price = settings.default_stock_price,
        calendar = %settings.calendar_policy,
        "configuration loaded"
    );

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(routes::cors_localhost_only());

    let addr: SocketAddr = settings
        .daemon_addr
        .parse()
        .with_context(|| format!("invalid daemon address: {}", settings.daemon_addr))?;
    info!("osp-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn load_config() -> anyhow::Result<LoadedConfig> {
    let raw = std::env::var(ENV_CONFIG_PATHS).unwrap_or_default();
    let paths: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paths.is_empty() {
        return LoadedConfig::empty();
    }
    load_layered_yaml(&paths)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
