//! Metrics and Monitoring Adapters
//!
//! Prometheus request metrics and the `/live` probe, both mounted on
//! the main proxy router.

pub mod health;
pub mod prometheus;

pub use prometheus::MetricsRegistry;
