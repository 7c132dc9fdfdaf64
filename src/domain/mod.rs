//! Domain layer - Request parameters, signing, kline schema and errors.
//!
//! Pure logic with no HTTP or runtime dependencies. Apart from the
//! credential pair, everything here lives for one proxied request.

pub mod error;
pub mod kline;
pub mod params;
pub mod signing;

pub use error::ProxyError;
pub use kline::{Endpoint, KLINE_COLUMNS};
pub use params::{PathParams, RequestParams};
pub use signing::{BinanceAuth, RequestSigner};
