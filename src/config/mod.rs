//! Configuration Module - TOML-based Proxy Configuration
//!
//! Loads and validates configuration from an optional `config.toml`
//! with environment variable overrides (`PORT`). Credentials are not
//! part of the file; they come from BINANCE_API_KEY / BINANCE_API_SECRET.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

/// Top-level proxy configuration.
///
/// Every section is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Listener and logging.
  #[serde(default)]
  pub server: ServerConfig,
  /// Upstream exchange endpoint.
  #[serde(default)]
  pub upstream: UpstreamConfig,
}

impl AppConfig {
  /// `host:port` to bind the listener on.
  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Interface to bind.
  #[serde(default = "default_host")]
  pub host: String,
  /// Listening port, overridable with `PORT`.
  #[serde(default = "default_port")]
  pub port: u16,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      log_level: default_log_level(),
    }
  }
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
  /// REST API base URL.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Timeout applied to every outbound call, in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_seconds: default_timeout(),
    }
  }
}

impl UpstreamConfig {
  /// Outbound call timeout.
  pub const fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }
}

// Default value functions for serde

fn default_host() -> String {
  "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
  5001
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_base_url() -> String {
  "https://api.binance.com".to_string()
}

const fn default_timeout() -> u64 {
  10
}
