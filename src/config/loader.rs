//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::purchase::{AssetSymbol, CurrencyCode};

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    route = %config.server.route,
    source = %config.pipeline.source_currency,
    target = %config.pipeline.target_currency,
    asset = %config.pipeline.crypto_asset,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Well-formed currency codes and asset symbol
/// - Non-empty ticket id and route
/// - Absolute http(s) base URLs
/// - Positive timeouts and a sane lot precision
/// - A stage timeout covering the crypto stage's two exchange requests
fn validate_config(config: &AppConfig) -> Result<()> {
  // Pipeline validation
  let pipeline = &config.pipeline;
  CurrencyCode::new(&pipeline.source_currency).context("pipeline.source_currency")?;
  CurrencyCode::new(&pipeline.target_currency).context("pipeline.target_currency")?;
  AssetSymbol::new(&pipeline.crypto_asset).context("pipeline.crypto_asset")?;
  anyhow::ensure!(
    !pipeline.ticket_id.trim().is_empty(),
    "pipeline.ticket_id must not be empty"
  );
  anyhow::ensure!(
    pipeline.stage_timeout_ms > 0,
    "pipeline.stage_timeout_ms must be positive"
  );

  // Server validation
  anyhow::ensure!(
    config.server.route.starts_with('/'),
    "server.route must start with '/', got {:?}",
    config.server.route
  );
  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server.bind_address must not be empty"
  );

  // API validation
  let urls = [
    ("api.wise_base_url", &config.api.wise_base_url),
    ("api.binance_base_url", &config.api.binance_base_url),
    ("api.marketplace_base_url", &config.api.marketplace_base_url),
  ];
  for (name, url) in urls {
    anyhow::ensure!(
      url.starts_with("http://") || url.starts_with("https://"),
      "{name} must be an http(s) URL, got {url:?}"
    );
  }
  anyhow::ensure!(
    config.api.request_timeout_ms > 0,
    "api.request_timeout_ms must be positive"
  );
  anyhow::ensure!(
    pipeline.stage_timeout_ms >= config.api.request_timeout_ms.saturating_mul(2),
    "pipeline.stage_timeout_ms ({}) must be at least twice api.request_timeout_ms ({})",
    pipeline.stage_timeout_ms,
    config.api.request_timeout_ms
  );

  // Exchange validation
  anyhow::ensure!(
    config.exchange.lot_decimals <= 18,
    "exchange.lot_decimals must be in [0, 18], got {}",
    config.exchange.lot_decimals
  );
  for (fiat, quote) in &config.exchange.quote_aliases {
    CurrencyCode::new(fiat).context("exchange.quote_aliases key")?;
    AssetSymbol::new(quote).context("exchange.quote_aliases value")?;
  }

  Ok(())
}
