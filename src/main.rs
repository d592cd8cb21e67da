//! NFT Ticket Purchaser - Entry Point
//!
//! Serves the purchase trigger until SIGINT, then drains in-flight
//! purchases and exits.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load API credentials from .env (WISE_API_KEY, BINANCE_API_KEY, NFT_MARKETPLACE_API_KEY)
//! 4. Create one ApiClient per remote service (base URL + auth + timeout)
//! 5. Create stage adapters (quotes, ticker + orders, marketplace)
//! 6. Assemble the PurchasePipeline
//! 7. Bind the trigger listener (purchase route + /live + /ready + /metrics)
//! 8. Wait for SIGINT -> readiness 503 -> graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use nft_ticket_purchaser::adapters::api::{
  ApiAuth, ApiClient, ApiClientConfig, BinanceCryptoPurchaser, BinancePriceOracle,
  MarketSymbols, MarketplaceTicketPurchaser, WiseRateConverter,
};
use nft_ticket_purchaser::adapters::http::{AppState, create_router};
use nft_ticket_purchaser::adapters::metrics::{HealthState, MetricsRegistry};
use nft_ticket_purchaser::config::{self, Credentials};
use nft_ticket_purchaser::domain::sizing::OrderSizer;
use nft_ticket_purchaser::ports::{CryptoPurchaser, PriceOracle, RateConverter, TicketPurchaser};
use nft_ticket_purchaser::usecases::{PipelineSettings, PurchasePipeline};

/// Overrides the configuration file path.
const CONFIG_PATH_VAR: &str = "TICKET_PURCHASER_CONFIG";
/// Overrides the credentials file path.
const ENV_FILE_VAR: &str = "TICKET_PURCHASER_ENV_FILE";

#[tokio::main]
async fn main() -> Result<()> {
  // ── 1. Load configuration from config.toml ──────────────
  let config_path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
  let config = config::loader::load_config(&config_path)
    .with_context(|| format!("Failed to load configuration from {config_path}"))?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
    )
    .json()
    .init();

  info!(
    version = env!("CARGO_PKG_VERSION"),
    route = %config.server.route,
    source = %config.pipeline.source_currency,
    target = %config.pipeline.target_currency,
    asset = %config.pipeline.crypto_asset,
    "Starting NFT ticket purchaser"
  );

  // ── 3. Load API credentials from .env ───────────────────
  let env_file = PathBuf::from(std::env::var(ENV_FILE_VAR).unwrap_or_else(|_| ".env".to_string()));
  let credentials = Credentials::load(&env_file).context("Failed to load API credentials")?;

  // ── 4. One HTTP client per remote service ───────────────
  let timeout = Duration::from_millis(config.api.request_timeout_ms);
  let wise_client = Arc::new(
    ApiClient::new(
      "wise",
      ApiAuth::bearer(credentials.wise_api_key()),
      ApiClientConfig::new(&config.api.wise_base_url, timeout),
    )
    .context("Failed to create quoting client")?,
  );
  // Ticker prices are public; only order placement carries the key.
  let ticker_client = Arc::new(
    ApiClient::new(
      "binance-ticker",
      ApiAuth::None,
      ApiClientConfig::new(&config.api.binance_base_url, timeout),
    )
    .context("Failed to create exchange ticker client")?,
  );
  let order_client = Arc::new(
    ApiClient::new(
      "binance",
      ApiAuth::binance_key(credentials.binance_api_key()),
      ApiClientConfig::new(&config.api.binance_base_url, timeout),
    )
    .context("Failed to create exchange order client")?,
  );
  let marketplace_client = Arc::new(
    ApiClient::new(
      "marketplace",
      ApiAuth::bearer(credentials.marketplace_api_key()),
      ApiClientConfig::new(&config.api.marketplace_base_url, timeout),
    )
    .context("Failed to create marketplace client")?,
  );

  // ── 5. Stage adapters ───────────────────────────────────
  let symbols = MarketSymbols::new(config.exchange.quote_aliases.clone());
  let converter: Arc<dyn RateConverter> = Arc::new(WiseRateConverter::new(wise_client));
  let oracle: Arc<dyn PriceOracle> =
    Arc::new(BinancePriceOracle::new(ticker_client, symbols.clone()));
  let crypto: Arc<dyn CryptoPurchaser> = Arc::new(BinanceCryptoPurchaser::new(
    order_client,
    oracle,
    OrderSizer::new(config.exchange.lot_decimals),
    symbols,
  ));
  let ticket: Arc<dyn TicketPurchaser> =
    Arc::new(MarketplaceTicketPurchaser::new(marketplace_client));

  // ── 6. Purchase pipeline ────────────────────────────────
  let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
  let settings =
    PipelineSettings::from_config(&config.pipeline).context("Invalid pipeline settings")?;
  let pipeline = Arc::new(PurchasePipeline::new(
    converter,
    crypto,
    ticket,
    settings,
    Arc::clone(&metrics),
  ));

  // ── 7. Trigger listener ─────────────────────────────────
  let health = Arc::new(HealthState::new());
  let exported_metrics = config.metrics.enabled.then(|| Arc::clone(&metrics));
  let state = AppState::new(pipeline, Arc::clone(&health), exported_metrics);
  let app = create_router(state, &config.server.route);

  let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
    .await
    .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
  info!(
    address = %config.server.bind_address,
    route = %config.server.route,
    metrics = config.metrics.enabled,
    "Trigger listener ready"
  );

  // ── 8. Serve until SIGINT, then drain ───────────────────
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal(health))
    .await
    .context("Trigger server failed")?;

  info!("Shutdown complete");
  Ok(())
}

/// Resolve on SIGINT after flipping readiness to 503.
async fn shutdown_signal(health: Arc<HealthState>) {
  if let Err(e) = signal::ctrl_c().await {
    warn!(error = %e, "Failed to listen for SIGINT, shutting down");
  } else {
    info!("SIGINT received, initiating graceful shutdown");
  }
  health.mark_draining();
}
