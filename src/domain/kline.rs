//! Kline Schema
//!
//! The exchange returns each candlestick as a positional 12-element array.
//! These are the column names, in array order.

/// Column headers for a kline row, in the order the exchange emits them.
pub const KLINE_COLUMNS: [&str; 12] = [
    "Open time",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Close time",
    "Quote asset volume",
    "Number of trades",
    "Taker buy base asset volume",
    "Taker buy quote asset volume",
    "Ignore",
];

/// Upstream endpoint a proxied request is forwarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Public market data, `/api/v3/klines`.
    Klines,
    /// Signed account information, `/api/v3/account`.
    Account,
}

impl Endpoint {
    /// Path relative to the upstream base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Klines => "/api/v3/klines",
            Self::Account => "/api/v3/account",
        }
    }
}
