//! Upstream Port - Exchange Market Data Interface
//!
//! Defines the trait the proxy pipeline uses to reach the exchange.
//! The pipeline builds a fully encoded (and, where required, signed)
//! request; implementors only perform the single outbound GET.
//!
//! Key design decisions:
//! - One attempt per call: no retries, no backoff
//! - The query string is opaque here and must be sent verbatim
//! - Failures are already classified as `ProxyError` variants

use async_trait::async_trait;

use crate::domain::{Endpoint, ProxyError};

/// A single outbound request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
  /// Target endpoint on the exchange.
  pub endpoint: Endpoint,
  /// Canonical encoded query string, including `signature` when signed.
  pub query: String,
  /// Value for the `X-MBX-APIKEY` header on signed endpoints.
  pub api_key: Option<String>,
}

impl UpstreamRequest {
  /// Unsigned request to a public endpoint.
  pub fn public(endpoint: Endpoint, query: String) -> Self {
    Self {
      endpoint,
      query,
      api_key: None,
    }
  }

  /// Signed request carrying the API key header.
  pub fn signed(endpoint: Endpoint, query: String, api_key: &str) -> Self {
    Self {
      endpoint,
      query,
      api_key: Some(api_key.to_string()),
    }
  }
}

/// Trait for exchange REST data sources.
///
/// Implementors issue the request and return the parsed JSON body on
/// 2xx. Non-2xx maps to `ProxyError::UpstreamHttp`, network failures
/// to `ProxyError::Transport`, and undecodable bodies to
/// `ProxyError::Unexpected`.
#[async_trait]
pub trait MarketDataSource: Send + Sync + 'static {
  /// Issue one GET and return the decoded JSON payload.
  async fn fetch(&self, request: UpstreamRequest) -> Result<serde_json::Value, ProxyError>;
}
