//! Request Signing — HMAC-SHA256 over the Canonical Query
//!
//! Signs account requests per the exchange's SIGNED endpoint rules:
//! `signature = hex(HMAC-SHA256(secret, query_string))`, appended as the
//! final query parameter. Credentials come from environment variables
//! (BINANCE_API_KEY, BINANCE_API_SECRET) and are read once at startup.

use std::fmt;

use url::form_urlencoded;

use super::error::ProxyError;
use super::params::RequestParams;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

/// Credential pair loaded at process start.
///
/// Either half may be absent; signed routes check this per request and
/// fail with a configuration error instead of refusing to start, so the
/// public routes stay usable without credentials.
#[derive(Clone, Default)]
pub struct BinanceAuth {
    /// API key, sent as the `X-MBX-APIKEY` header.
    api_key: Option<String>,
    /// API secret (never sent, never logged).
    api_secret: Option<String>,
}

impl BinanceAuth {
    /// Build from optional values. Empty strings count as unset.
    pub fn new(api_key: Option<String>, api_secret: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_secret: api_secret.filter(|s| !s.is_empty()),
        }
    }

    /// Load credentials from BINANCE_API_KEY / BINANCE_API_SECRET.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(API_SECRET_VAR).ok(),
        )
    }

    /// Whether both halves of the pair are present.
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }

    /// Borrow a signer, or report which variables are missing.
    pub fn signer(&self) -> Result<RequestSigner<'_>, ProxyError> {
        match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(api_key), Some(api_secret)) => Ok(RequestSigner {
                api_key,
                api_secret,
            }),
            (key, secret) => {
                let missing: Vec<&str> = [(API_KEY_VAR, key), (API_SECRET_VAR, secret)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(ProxyError::Configuration(format!(
                    "Binance API credentials not configured: {} not set",
                    missing.join(", ")
                )))
            }
        }
    }
}

impl fmt::Debug for BinanceAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<redacted>" } else { "<unset>" };
        f.debug_struct("BinanceAuth")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

/// Borrowed view over a complete credential pair.
pub struct RequestSigner<'a> {
    api_key: &'a str,
    api_secret: &'a str,
}

impl RequestSigner<'_> {
    /// API key for the request header.
    pub const fn api_key(&self) -> &str {
        self.api_key
    }

    /// Lowercase hex HMAC-SHA256 of `message`, keyed by the API secret.
    pub fn sign(&self, message: &str) -> String {
        let mac = hmac_sha256::HMAC::mac(message.as_bytes(), self.api_secret.as_bytes());
        hex::encode(mac)
    }

    /// Encode `params`, sign the encoding, and append `signature` last.
    ///
    /// The returned string is the exact outbound query; its prefix is the
    /// exact HMAC input.
    pub fn sign_params(&self, params: &RequestParams) -> String {
        let query = params.encode();
        let signature = self.sign(&query);
        form_urlencoded::Serializer::for_suffix(query, 0)
            .append_pair("signature", &signature)
            .finish()
    }
}

impl fmt::Debug for RequestSigner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

/// Current Unix time in milliseconds, as the exchange expects.
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
