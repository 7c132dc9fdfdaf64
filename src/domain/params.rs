//! Request Parameters - Ordered Query Mapping and Collection Rules
//!
//! `RequestParams` is the single source of the outbound query string. The
//! same instance is encoded once for signing and sent verbatim, so key order
//! can never drift between the HMAC input and the wire.

use std::collections::HashSet;

use url::form_urlencoded;

use super::error::ProxyError;

/// Query keys forwarded to the klines endpoint, in outbound order.
pub const KLINE_KEYS: [&str; 5] = ["symbol", "interval", "startTime", "endTime", "limit"];

/// Keys that must be present on query-string kline routes.
pub const REQUIRED_KLINE_KEYS: [&str; 2] = ["symbol", "interval"];

/// Ordered mapping from parameter name to value.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the mapping holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical `application/x-www-form-urlencoded` encoding.
    ///
    /// This is both the HMAC input and the literal outbound query string.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Collect klines parameters from a query string.
    ///
    /// Copies every recognized key with a non-empty value, first occurrence
    /// winning. Fails when `symbol` or `interval` is absent.
    pub fn from_kline_query(query: &[(String, String)]) -> Result<Self, ProxyError> {
        let mut params = Self::new();
        for key in KLINE_KEYS {
            if let Some(value) = first_value(query, key).filter(|v| !v.is_empty()) {
                params.insert(key, value);
            }
        }

        let missing: Vec<&str> = REQUIRED_KLINE_KEYS
            .into_iter()
            .filter(|key| params.get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ProxyError::Validation(format!(
                "Missing required parameter(s): {}",
                missing.join(", ")
            )));
        }

        Ok(params)
    }

    /// Build klines parameters from path segments.
    pub fn from_path(path: &PathParams) -> Self {
        let mut params = Self::new();
        params.insert("symbol", path.symbol.as_str());
        params.insert("interval", path.interval.as_str());
        params.insert("limit", path.limit.as_str());
        params
    }

    /// Build account parameters: `timestamp` first, then the caller's pairs.
    ///
    /// Caller values overwrite the injected timestamp. For a repeated caller
    /// key the first occurrence wins. Empty values pass through.
    pub fn for_account(timestamp_ms: i64, query: &[(String, String)]) -> Self {
        let mut params = Self::new();
        params.insert("timestamp", timestamp_ms.to_string());

        let mut seen = HashSet::new();
        for (key, value) in query {
            if seen.insert(key.as_str()) {
                params.insert(key.as_str(), value.as_str());
            }
        }
        params
    }
}

/// Segments of a `/<symbol>/<interval>/<limit>` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    pub symbol: String,
    pub interval: String,
    /// Decimal digits without leading zeros. Unbounded: range checks are
    /// left to the exchange.
    pub limit: String,
}

impl PathParams {
    /// Match raw path segments. `limit` must be plain ASCII digits.
    ///
    /// Returns `None` when the route shape does not match.
    pub fn parse(symbol: &str, interval: &str, limit: &str) -> Option<Self> {
        if limit.is_empty() || !limit.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = limit.trim_start_matches('0');
        let limit = if trimmed.is_empty() { "0" } else { trimmed };
        Some(Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            limit: limit.to_string(),
        })
    }
}

/// Decode a raw query string into ordered pairs, keeping duplicates.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn first_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
