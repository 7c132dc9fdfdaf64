//! Binance REST Adapter
//!
//! Sub-modules:
//! - `client`: reqwest-based `MarketDataSource` implementation

pub mod client;

pub use client::{BinanceClient, BinanceClientConfig};
