//! Configuration Loader - File Loading, Overrides and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters, and providing clear error messages
//! for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use url::Url;

use super::AppConfig;

/// File read when no explicit path is given. Optional.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Environment variable naming an explicit config file. Must exist.
pub const CONFIG_PATH_VAR: &str = "PROXY_CONFIG";
/// Environment variable overriding `server.port`.
pub const PORT_VAR: &str = "PORT";

/// Load configuration using the process environment.
pub fn load_from_env() -> Result<AppConfig> {
  let explicit = std::env::var(CONFIG_PATH_VAR).ok();
  load_with(explicit.as_deref(), |name| std::env::var(name).ok())
}

/// Load configuration from an explicit or default path plus overrides.
///
/// # Arguments
/// * `explicit_path` - Config file that must exist, if any
/// * `env` - Lookup for environment overrides
///
/// # Errors
/// Returns detailed error if:
/// - An explicit file doesn't exist or can't be read
/// - TOML parsing fails
/// - An override can't be parsed
/// - Validation rules are violated
pub fn load_with(
  explicit_path: Option<&str>,
  env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
  load_from(explicit_path, Path::new(DEFAULT_CONFIG_PATH), env)
}

/// Same as [`load_with`] with the optional default file at `default_path`.
fn load_from(
  explicit_path: Option<&str>,
  default_path: &Path,
  env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
  let mut config = match explicit_path {
    Some(path) => load_config(path)?,
    None if default_path.exists() => read_config(default_path)?,
    None => AppConfig::default(),
  };

  apply_env_overrides(&mut config, env)?;
  validate_config(&config)?;

  info!(
    bind = %config.bind_address(),
    upstream = %config.upstream.base_url,
    timeout_s = config.upstream.timeout_seconds,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Read and parse a TOML file without overrides or validation.
pub fn load_config(path: &str) -> Result<AppConfig> {
  read_config(Path::new(path))
}

fn read_config(path: &Path) -> Result<AppConfig> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content)
    .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse TOML content into a config.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  toml::from_str(content).context("Invalid configuration TOML")
}

fn apply_env_overrides(
  config: &mut AppConfig,
  env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
  if let Some(port) = env(PORT_VAR).filter(|p| !p.is_empty()) {
    config.server.port = port
      .parse()
      .with_context(|| format!("{PORT_VAR} must be a port number, got {port:?}"))?;
  }
  Ok(())
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.server.host.is_empty(),
    "server.host must not be empty"
  );
  anyhow::ensure!(
    !config.server.log_level.is_empty(),
    "server.log_level must not be empty"
  );

  let base = Url::parse(&config.upstream.base_url)
    .with_context(|| format!("upstream.base_url is not a URL: {}", config.upstream.base_url))?;
  anyhow::ensure!(
    matches!(base.scheme(), "http" | "https"),
    "upstream.base_url must be http(s), got {}",
    base.scheme()
  );
  anyhow::ensure!(
    config.upstream.timeout_seconds > 0,
    "upstream.timeout_seconds must be positive"
  );

  Ok(())
}
