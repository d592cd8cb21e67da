//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates non-secret settings from `config.toml` and
//! API credentials from a `.env` file. Both are read once at startup
//! and passed by reference to the components that need them.
//! Endpoints, currencies and the ticket id are externalized here -
//! nothing is hardcoded in the adapters.

pub mod credentials;
pub mod loader;

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::purchase::TicketAmountSource;
use crate::domain::sizing::DEFAULT_LOT_DECIMALS;

pub use credentials::Credentials;

/// Top-level service configuration.
///
/// Every section has defaults, so an empty `config.toml` yields the
/// original IDR -> USD -> BTC -> ticket setup on port 3000.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// HTTP listener and logging.
  #[serde(default)]
  pub server: ServerConfig,
  /// Purchase pipeline parameters.
  #[serde(default)]
  pub pipeline: PipelineConfig,
  /// Remote service endpoints.
  #[serde(default)]
  pub api: ApiConfig,
  /// Crypto exchange specifics.
  #[serde(default)]
  pub exchange: ExchangeConfig,
  /// Metrics export.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Inbound trigger listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Listener bind address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Path of the purchase trigger route.
  #[serde(default = "default_route")]
  pub route: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
      route: default_route(),
      log_level: default_log_level(),
    }
  }
}

/// Purchase pipeline parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
  /// Currency of the inbound amount.
  #[serde(default = "default_source_currency")]
  pub source_currency: String,
  /// Currency the amount is converted into before buying crypto.
  #[serde(default = "default_target_currency")]
  pub target_currency: String,
  /// Crypto asset bought and spent on the ticket.
  #[serde(default = "default_crypto_asset")]
  pub crypto_asset: String,
  /// Marketplace identifier of the ticket NFT.
  #[serde(default = "default_ticket_id")]
  pub ticket_id: String,
  /// Upper bound on a single stage, remote calls included.
  #[serde(default = "default_stage_timeout")]
  pub stage_timeout_ms: u64,
  /// Amount passed as the ticket's crypto amount.
  #[serde(default)]
  pub ticket_amount_source: TicketAmountSource,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      source_currency: default_source_currency(),
      target_currency: default_target_currency(),
      crypto_asset: default_crypto_asset(),
      ticket_id: default_ticket_id(),
      stage_timeout_ms: default_stage_timeout(),
      ticket_amount_source: TicketAmountSource::default(),
    }
  }
}

/// Remote service endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Fiat quoting service base URL.
  #[serde(default = "default_wise_url")]
  pub wise_base_url: String,
  /// Crypto exchange base URL (market data and orders).
  #[serde(default = "default_binance_url")]
  pub binance_base_url: String,
  /// NFT marketplace base URL.
  #[serde(default = "default_marketplace_url")]
  pub marketplace_base_url: String,
  /// Per-request timeout in milliseconds.
  #[serde(default = "default_request_timeout")]
  pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      wise_base_url: default_wise_url(),
      binance_base_url: default_binance_url(),
      marketplace_base_url: default_marketplace_url(),
      request_timeout_ms: default_request_timeout(),
    }
  }
}

/// Crypto exchange configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
  /// Fiat code -> exchange quote asset (USD trades as USDT).
  #[serde(default = "default_quote_aliases")]
  pub quote_aliases: HashMap<String, String>,
  /// Decimal places of the minimum lot size.
  #[serde(default = "default_lot_decimals")]
  pub lot_decimals: u32,
}

impl Default for ExchangeConfig {
  fn default() -> Self {
    Self {
      quote_aliases: default_quote_aliases(),
      lot_decimals: default_lot_decimals(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve Prometheus metrics on `/metrics`.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_bind_address() -> String {
  "0.0.0.0:3000".to_string()
}

fn default_route() -> String {
  "/purchase-nft-ticket".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_source_currency() -> String {
  "IDR".to_string()
}

fn default_target_currency() -> String {
  "USD".to_string()
}

fn default_crypto_asset() -> String {
  "BTC".to_string()
}

fn default_ticket_id() -> String {
  "TICKET_NFT_ID".to_string()
}

fn default_stage_timeout() -> u64 {
  30_000
}

fn default_wise_url() -> String {
  "https://api.transferwise.com".to_string()
}

fn default_binance_url() -> String {
  "https://api.binance.com".to_string()
}

fn default_marketplace_url() -> String {
  "https://api.nftmarketplace.com".to_string()
}

fn default_request_timeout() -> u64 {
  10_000
}

fn default_quote_aliases() -> HashMap<String, String> {
  HashMap::from([("USD".to_string(), "USDT".to_string())])
}

fn default_lot_decimals() -> u32 {
  DEFAULT_LOT_DECIMALS
}

fn default_true() -> bool {
  true
}
