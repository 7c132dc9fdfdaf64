//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `MarketDataSource`: Single-shot REST calls to the exchange

pub mod upstream;

pub use upstream::{MarketDataSource, UpstreamRequest};
