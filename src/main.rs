//! Binance Kline Proxy — Entry Point
//!
//! Wiring sequence:
//! 1. Load `.env` (credentials may live there)
//! 2. Load config.toml (optional) + PORT override + validate
//! 3. Init tracing (JSON structured logging)
//! 4. Load credentials from env vars (BINANCE_API_KEY, BINANCE_API_SECRET)
//! 5. Create BinanceClient (HTTP + bounded timeout, no retries)
//! 6. Create metrics registry
//! 7. Build the router over the shared proxy pipeline
//! 8. Serve until SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use binance_kline_proxy::adapters::binance::{BinanceClient, BinanceClientConfig};
use binance_kline_proxy::adapters::http::{AppState, build_router};
use binance_kline_proxy::adapters::metrics::MetricsRegistry;
use binance_kline_proxy::config;
use binance_kline_proxy::domain::BinanceAuth;
use binance_kline_proxy::usecases::ProxyService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Pick up a local .env if there is one ─────────────
    let dotenv_path = dotenv::dotenv().ok();

    // ── 2. Load configuration ───────────────────────────────
    let config = config::loader::load_from_env().context("Failed to load configuration")?;

    // ── 3. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.bind_address(),
        upstream = %config.upstream.base_url,
        dotenv = dotenv_path.is_some(),
        "Starting Binance kline proxy"
    );

    // ── 4. Credentials, read once ───────────────────────────
    let auth = BinanceAuth::from_env();
    if !auth.is_configured() {
        warn!("Binance API credentials not set; /binance_account will answer 500");
    }

    // ── 5. Upstream client ──────────────────────────────────
    let client_config = BinanceClientConfig {
        base_url: config.upstream.base_url.clone(),
        timeout: config.upstream.timeout(),
    };
    let client = Arc::new(
        BinanceClient::new(client_config).context("Failed to create Binance client")?,
    );

    // ── 6. Metrics ──────────────────────────────────────────
    let metrics = MetricsRegistry::new().context("Failed to register metrics")?;

    // ── 7. Router ───────────────────────────────────────────
    let state = Arc::new(AppState::new(ProxyService::new(client, auth), metrics));
    let app = build_router(state);

    // ── 8. Serve ────────────────────────────────────────────
    let bind = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(address = %bind, "Proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on SIGINT. If the handler can't be installed, never resolve.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("SIGINT received, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    }
}
