//! Prometheus Metrics Registry - Proxy Observability
//!
//! Counts proxied requests by route and outcome and times the full
//! Collect → Sign → Forward pipeline. Exposed as text on `/metrics`.

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Centralized Prometheus metrics for the proxy.
///
/// All metrics follow the naming convention `binance_proxy_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Requests handled, labelled by route and outcome.
    pub requests: IntCounterVec,
    /// End-to-end pipeline latency in seconds.
    pub request_duration: HistogramVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "binance_proxy_requests_total",
                "Proxied requests by route and outcome",
            ),
            &["route", "outcome"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "binance_proxy_request_duration_seconds",
                "Pipeline latency including the upstream call",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["route"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests,
            request_duration,
        })
    }

    /// Record one finished request.
    pub fn observe(&self, route: &str, outcome: &str, elapsed: Duration) {
        self.requests.with_label_values(&[route, outcome]).inc();
        self.request_duration
            .with_label_values(&[route])
            .observe(elapsed.as_secs_f64());
    }

    /// Encode all metric families in the Prometheus text format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
