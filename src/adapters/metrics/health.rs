//! Liveness Probe
//!
//! The proxy holds no connections or background tasks, so the process
//! being able to answer is the whole health signal.

use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Liveness probe: always returns 200 if the process is running.
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
