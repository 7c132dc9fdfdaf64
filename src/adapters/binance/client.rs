//! Binance REST Client - Single-shot Upstream Forwarder
//!
//! Wraps reqwest with a bounded timeout and implements the
//! `MarketDataSource` port. Every call is exactly one GET; failures
//! are classified once and returned, never retried.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::ProxyError;
use crate::ports::{MarketDataSource, UpstreamRequest};

/// Header carrying the API key on signed endpoints.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Characters of the upstream body kept in debug logs.
const BODY_PREVIEW_CHARS: usize = 500;

/// Configuration for the Binance HTTP client.
#[derive(Debug, Clone)]
pub struct BinanceClientConfig {
  /// Base URL for the REST API (no trailing path).
  pub base_url: String,
  /// Timeout applied to every outbound request.
  pub timeout: Duration,
}

impl Default for BinanceClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.binance.com".to_string(),
      timeout: Duration::from_secs(10),
    }
  }
}

/// HTTP client for the Binance spot REST API.
pub struct BinanceClient {
  /// Underlying pooled HTTP client.
  http: Client,
  /// Client configuration.
  config: BinanceClientConfig,
}

impl BinanceClient {
  /// Create a new client.
  pub fn new(config: BinanceClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  /// Full URL for a request, with its query string set verbatim.
  fn url(&self, request: &UpstreamRequest) -> Result<Url, ProxyError> {
    let raw = format!(
      "{}{}",
      self.config.base_url.trim_end_matches('/'),
      request.endpoint.path()
    );
    let mut url = Url::parse(&raw)
      .map_err(|e| ProxyError::Unexpected(format!("invalid upstream URL {raw}: {e}")))?;
    url.set_query((!request.query.is_empty()).then_some(request.query.as_str()));
    Ok(url)
  }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
  #[instrument(skip(self, request), fields(endpoint = ?request.endpoint))]
  async fn fetch(&self, request: UpstreamRequest) -> Result<serde_json::Value, ProxyError> {
    let url = self.url(&request)?;

    let mut req = self.http.get(url);
    if let Some(api_key) = &request.api_key {
      req = req.header(API_KEY_HEADER, api_key);
    }

    let response = req.send().await.map_err(|e| {
      warn!(error = %e, timeout = e.is_timeout(), "Upstream request failed");
      ProxyError::Transport(e.to_string())
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
      warn!(error = %e, "Failed to read upstream body");
      ProxyError::Transport(e.to_string())
    })?;

    debug!(
      status = status.as_u16(),
      body = %preview(&body),
      "Upstream responded"
    );

    if !status.is_success() {
      return Err(ProxyError::UpstreamHttp {
        status: status.as_u16(),
        body,
      });
    }

    serde_json::from_str(&body)
      .map_err(|e| ProxyError::Unexpected(format!("invalid JSON from upstream: {e}")))
  }
}

fn preview(body: &str) -> String {
  body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Endpoint;

  fn client(base_url: &str) -> BinanceClient {
    BinanceClient::new(BinanceClientConfig {
      base_url: base_url.to_string(),
      ..Default::default()
    })
    .unwrap()
  }

  #[test]
  fn test_url_keeps_query_verbatim() {
    let request = UpstreamRequest::public(
      Endpoint::Klines,
      "symbol=BTCUSDT&interval=1h&limit=10".to_string(),
    );
    let url = client("https://api.binance.com/").url(&request).unwrap();
    assert_eq!(
      url.as_str(),
      "https://api.binance.com/api/v3/klines?symbol=BTCUSDT&interval=1h&limit=10"
    );
  }

  #[test]
  fn test_url_without_query() {
    let request = UpstreamRequest::public(Endpoint::Account, String::new());
    let url = client("http://127.0.0.1:9").url(&request).unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:9/api/v3/account");
  }

  #[test]
  fn test_invalid_base_url_is_unexpected() {
    let request = UpstreamRequest::public(Endpoint::Klines, String::new());
    let err = client("not a url").url(&request).unwrap_err();
    assert!(matches!(err, ProxyError::Unexpected(_)));
  }

  #[test]
  fn test_preview_truncates_on_char_boundary() {
    let body = "é".repeat(BODY_PREVIEW_CHARS + 10);
    assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    assert_eq!(preview("short"), "short");
  }
}
