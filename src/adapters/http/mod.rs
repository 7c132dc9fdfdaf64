//! Inbound HTTP Adapter
//!
//! Sub-modules:
//! - `routes`: axum router, handlers and shared state
//! - `render`: JSON / HTML response rendering

pub mod render;
pub mod routes;

pub use render::OutputFormat;
pub use routes::{AppState, build_router};
