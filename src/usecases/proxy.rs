//! Proxy Pipeline - Collect → (Sign) → Forward
//!
//! One pipeline shared by every route. Routes differ only in where the
//! parameters come from (`ParamSource`) and which endpoint they hit;
//! rendering is left to the HTTP adapter.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::signing::{self, BinanceAuth};
use crate::domain::{Endpoint, PathParams, ProxyError, RequestParams};
use crate::ports::{MarketDataSource, UpstreamRequest};

/// Where a klines request takes its parameters from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSource {
  /// Decoded inbound query pairs, in arrival order.
  Query(Vec<(String, String)>),
  /// Matched `/<symbol>/<interval>/<limit>` segments.
  Path(PathParams),
}

/// Stateless proxy over a market data source.
pub struct ProxyService<S: MarketDataSource> {
  /// Upstream port.
  source: Arc<S>,
  /// Credential pair, immutable for the process lifetime.
  auth: BinanceAuth,
}

impl<S: MarketDataSource> ProxyService<S> {
  /// Create a new proxy service.
  pub const fn new(source: Arc<S>, auth: BinanceAuth) -> Self {
    Self { source, auth }
  }

  /// Forward a public klines request.
  ///
  /// Query sources are validated before anything goes upstream.
  #[instrument(skip(self, params))]
  pub async fn klines(&self, params: ParamSource) -> Result<Value, ProxyError> {
    let params = match params {
      ParamSource::Query(query) => RequestParams::from_kline_query(&query)?,
      ParamSource::Path(path) => RequestParams::from_path(&path),
    };

    let query = params.encode();
    debug!(query = %query, "Forwarding klines request");

    self
      .source
      .fetch(UpstreamRequest::public(Endpoint::Klines, query))
      .await
  }

  /// Forward a signed account request stamped with the current time.
  pub async fn account(&self, query: &[(String, String)]) -> Result<Value, ProxyError> {
    self.account_at(signing::timestamp_ms(), query).await
  }

  /// Forward a signed account request with an explicit timestamp.
  ///
  /// Credentials are checked before any network call.
  #[instrument(skip(self, query))]
  pub async fn account_at(
    &self,
    timestamp_ms: i64,
    query: &[(String, String)],
  ) -> Result<Value, ProxyError> {
    let signer = self.auth.signer()?;

    let params = RequestParams::for_account(timestamp_ms, query);
    let signed = signer.sign_params(&params);
    debug!(params = params.len(), "Forwarding signed account request");

    self
      .source
      .fetch(UpstreamRequest::signed(Endpoint::Account, signed, signer.api_key()))
      .await
  }
}
