//! Proxy Routes - Inbound HTTP Surface
//!
//! Every route funnels into the shared `ProxyService` pipeline; routes
//! only pick the parameter source, the endpoint and the output format.
//! The misspelled `klnes` paths are kept as aliases.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::Value;
use tracing::{error, info};

use super::render::OutputFormat;
use crate::adapters::metrics::{MetricsRegistry, health};
use crate::domain::params::parse_query;
use crate::domain::{PathParams, ProxyError};
use crate::ports::MarketDataSource;
use crate::usecases::proxy::{ParamSource, ProxyService};

/// Shared, read-only state for all handlers.
pub struct AppState<S: MarketDataSource> {
    /// Collect → Sign → Forward pipeline.
    pub proxy: ProxyService<S>,
    /// Request metrics.
    pub metrics: MetricsRegistry,
}

impl<S: MarketDataSource> AppState<S> {
    pub const fn new(proxy: ProxyService<S>, metrics: MetricsRegistry) -> Self {
        Self { proxy, metrics }
    }
}

type SharedState<S> = State<Arc<AppState<S>>>;

/// Build the proxy router.
pub fn build_router<S: MarketDataSource>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        // Klines, query parameters
        .route("/binance_klines", get(klines_query_json::<S>))
        .route("/binance_klines_html", get(klines_query_html::<S>))
        .route("/binance_klnes_html", get(klines_query_html::<S>))
        // Klines, path parameters
        .route("/binance_klines/:symbol/:interval/:limit", get(klines_path_json::<S>))
        .route("/binance_klnes/:symbol/:interval/:limit", get(klines_path_json::<S>))
        .route("/binance_klines_html/:symbol/:interval/:limit", get(klines_path_html::<S>))
        .route("/binance_klnes_html/:symbol/:interval/:limit", get(klines_path_html::<S>))
        // Signed account
        .route("/binance_account", get(account::<S>))
        // Operational
        .route("/live", get(health::liveness))
        .route("/metrics", get(metrics::<S>))
        .with_state(state)
}

async fn klines_query_json<S: MarketDataSource>(
    State(state): SharedState<S>,
    RawQuery(raw): RawQuery,
) -> Response {
    let source = ParamSource::Query(parse_query(raw.as_deref()));
    proxy_klines(&state, source, OutputFormat::Json).await
}

async fn klines_query_html<S: MarketDataSource>(
    State(state): SharedState<S>,
    RawQuery(raw): RawQuery,
) -> Response {
    let source = ParamSource::Query(parse_query(raw.as_deref()));
    proxy_klines(&state, source, OutputFormat::Html).await
}

async fn klines_path_json<S: MarketDataSource>(
    State(state): SharedState<S>,
    Path(segments): Path<(String, String, String)>,
) -> Response {
    match path_source(&segments) {
        Some(source) => proxy_klines(&state, source, OutputFormat::Json).await,
        None => not_found(),
    }
}

async fn klines_path_html<S: MarketDataSource>(
    State(state): SharedState<S>,
    Path(segments): Path<(String, String, String)>,
) -> Response {
    match path_source(&segments) {
        Some(source) => proxy_klines(&state, source, OutputFormat::Html).await,
        None => not_found(),
    }
}

async fn account<S: MarketDataSource>(
    State(state): SharedState<S>,
    RawQuery(raw): RawQuery,
) -> Response {
    let query = parse_query(raw.as_deref());
    let started = Instant::now();
    let result = state.proxy.account(&query).await;
    finish(&state, "account", started, result, OutputFormat::Json)
}

async fn metrics<S: MarketDataSource>(State(state): SharedState<S>) -> Response {
    match state.metrics.encode() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn proxy_klines<S: MarketDataSource>(
    state: &AppState<S>,
    source: ParamSource,
    format: OutputFormat,
) -> Response {
    let route = match format {
        OutputFormat::Json => "klines_json",
        OutputFormat::Html => "klines_html",
    };
    let started = Instant::now();
    let result = state.proxy.klines(source).await;
    finish(state, route, started, result, format)
}

/// Record metrics, log the outcome, and render.
fn finish<S: MarketDataSource>(
    state: &AppState<S>,
    route: &'static str,
    started: Instant,
    result: Result<Value, ProxyError>,
    format: OutputFormat,
) -> Response {
    let elapsed = started.elapsed();
    match &result {
        Ok(_) => {
            state.metrics.observe(route, "ok", elapsed);
            info!(route, elapsed_ms = elapsed.as_millis(), "Proxied request");
        }
        Err(e) => {
            state.metrics.observe(route, e.outcome(), elapsed);
            if e.is_caller_error() {
                info!(route, error = %e, "Rejected request");
            } else {
                error!(route, kind = e.kind(), error = %e, "Proxied request failed");
            }
        }
    }
    format.render(result)
}

fn path_source((symbol, interval, limit): &(String, String, String)) -> Option<ParamSource> {
    PathParams::parse(symbol, interval, limit).map(ParamSource::Path)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
