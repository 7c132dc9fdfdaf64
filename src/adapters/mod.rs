//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies, and hosts the inbound HTTP surface.
//!
//! Adapter categories:
//! - `binance`: Binance REST client and request signing
//! - `http`: axum routes and response rendering
//! - `metrics`: Prometheus metrics export and liveness probe

pub mod binance;
pub mod http;
pub mod metrics;
