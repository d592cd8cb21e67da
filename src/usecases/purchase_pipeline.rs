//! Purchase Pipeline - Fiat to NFT Ticket Orchestration
//!
//! Runs one purchase as an explicit state machine:
//!
//! ```text
//! Start -> Converting -> BuyingCrypto -> BuyingTicket -> Done
//!   \          \              \               \
//!    +----------+--------------+---------------+--> Failed(stage, cause)
//! ```
//!
//! Each stage consumes the previous stage's output. The first failure
//! is terminal: later stages are never attempted, nothing is retried
//! and completed stages are not undone. In particular a crypto order
//! that was filled stays filled when the ticket purchase fails; the
//! order id is logged so the run can be reconciled by hand.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::adapters::metrics::MetricsRegistry;
use crate::config::PipelineConfig;
use crate::domain::error::{PipelineError, Stage, ValidationError};
use crate::domain::purchase::{
  AssetSymbol, ConversionQuote, CryptoOrder, CurrencyCode, PurchaseReceipt, PurchaseRequest,
  TicketAmountSource,
};
use crate::ports::{CryptoPurchaser, RateConverter, TicketPurchaser};

/// Validated pipeline parameters.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
  /// Currency of the inbound amount.
  pub source_currency: CurrencyCode,
  /// Currency the amount is converted into.
  pub target_currency: CurrencyCode,
  /// Asset bought and spent on the ticket.
  pub crypto_asset: AssetSymbol,
  /// Marketplace ticket identifier.
  pub ticket_id: String,
  /// Upper bound per stage.
  pub stage_timeout: Duration,
  /// Which amount the ticket purchase receives.
  pub ticket_amount_source: TicketAmountSource,
}

impl PipelineSettings {
  /// Build typed settings from the raw configuration section.
  pub fn from_config(config: &PipelineConfig) -> Result<Self, ValidationError> {
    Ok(Self {
      source_currency: CurrencyCode::new(&config.source_currency)?,
      target_currency: CurrencyCode::new(&config.target_currency)?,
      crypto_asset: AssetSymbol::new(&config.crypto_asset)?,
      ticket_id: config.ticket_id.clone(),
      stage_timeout: Duration::from_millis(config.stage_timeout_ms),
      ticket_amount_source: config.ticket_amount_source,
    })
  }
}

/// State of a single pipeline run.
#[derive(Debug)]
pub enum PipelineState {
  /// Raw inbound amount, not yet validated.
  Start { source_amount: Decimal },
  /// Valid request awaiting conversion.
  Converting { request: PurchaseRequest },
  /// Converted amount awaiting the crypto buy.
  BuyingCrypto { quote: ConversionQuote },
  /// Crypto bought, ticket purchase pending.
  BuyingTicket {
    quote: ConversionQuote,
    order: CryptoOrder,
  },
  /// Ticket acquired.
  Done(PurchaseReceipt),
  /// Stopped at `stage`.
  Failed { stage: Stage, error: PipelineError },
}

impl PipelineState {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Start { .. } => "start",
      Self::Converting { .. } => "converting",
      Self::BuyingCrypto { .. } => "buying_crypto",
      Self::BuyingTicket { .. } => "buying_ticket",
      Self::Done(_) => "done",
      Self::Failed { .. } => "failed",
    }
  }

  fn failed(error: PipelineError) -> Self {
    Self::Failed {
      stage: error.stage(),
      error,
    }
  }
}

/// Fail-fast orchestrator over the three purchase stages.
///
/// Holds no per-run state, so one instance serves any number of
/// concurrent runs.
pub struct PurchasePipeline {
  converter: Arc<dyn RateConverter>,
  crypto: Arc<dyn CryptoPurchaser>,
  ticket: Arc<dyn TicketPurchaser>,
  settings: PipelineSettings,
  metrics: Arc<MetricsRegistry>,
}

impl PurchasePipeline {
  /// Create a new pipeline over the given stage ports.
  pub fn new(
    converter: Arc<dyn RateConverter>,
    crypto: Arc<dyn CryptoPurchaser>,
    ticket: Arc<dyn TicketPurchaser>,
    settings: PipelineSettings,
    metrics: Arc<MetricsRegistry>,
  ) -> Self {
    Self {
      converter,
      crypto,
      ticket,
      settings,
      metrics,
    }
  }

  pub fn settings(&self) -> &PipelineSettings {
    &self.settings
  }

  /// Spend `source_amount` of the configured source currency on the ticket.
  ///
  /// # Errors
  /// Returns the `PipelineError` of the first stage that failed.
  pub async fn purchase(&self, source_amount: Decimal) -> Result<PurchaseReceipt, PipelineError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("purchase", %run_id);

    async move {
      info!(
        %source_amount,
        currency = %self.settings.source_currency,
        "Purchase pipeline started"
      );

      let mut state = PipelineState::Start { source_amount };
      loop {
        state = match state {
          PipelineState::Done(receipt) => {
            self.metrics.record_run(None);
            info!(
              tx_hash = %receipt.transaction_hash(),
              order_id = %receipt.order.order_id,
              "Purchase pipeline completed"
            );
            return Ok(receipt);
          }
          PipelineState::Failed { stage, error } => {
            self.metrics.record_run(Some(stage));
            error!(%stage, error = %error, "Purchase pipeline failed");
            return Err(error);
          }
          active => {
            let from = active.name();
            let next = self.advance(run_id, active).await;
            debug!(from, to = next.name(), "Pipeline transition");
            next
          }
        };
      }
    }
    .instrument(span)
    .await
  }

  /// Run the stage for `state` and return the next state.
  async fn advance(&self, run_id: Uuid, state: PipelineState) -> PipelineState {
    match state {
      PipelineState::Start { source_amount } => {
        match PurchaseRequest::new(
          source_amount,
          self.settings.source_currency.clone(),
          self.settings.target_currency.clone(),
        ) {
          Ok(request) => PipelineState::Converting { request },
          Err(e) => PipelineState::failed(e.into()),
        }
      }

      PipelineState::Converting { request } => {
        let result = self
          .timed(
            Stage::Converting,
            self.converter.convert(
              request.source_amount(),
              request.source_currency(),
              request.target_currency(),
            ),
          )
          .await;

        match result {
          Ok(quote) => {
            info!(
              source_amount = %request.source_amount(),
              source_currency = %request.source_currency(),
              target_amount = %quote.target_amount,
              target_currency = %quote.target_currency,
              "Conversion complete"
            );
            PipelineState::BuyingCrypto { quote }
          }
          Err(e) => PipelineState::failed(e),
        }
      }

      PipelineState::BuyingCrypto { quote } => {
        let fiat = quote.target_fiat();
        let result = self
          .timed(
            Stage::BuyingCrypto,
            self.crypto.buy(&fiat, &self.settings.crypto_asset),
          )
          .await;

        match result {
          Ok(order) => {
            info!(
              order_id = %order.order_id,
              asset = %order.asset,
              quantity = %order.quantity,
              spot_price = %order.spot_price,
              spent = %fiat,
              "Crypto order placed"
            );
            PipelineState::BuyingTicket { quote, order }
          }
          Err(e) => {
            if matches!(e, PipelineError::StageTimeout { .. }) {
              // The order request may still land after the stage gave up on it.
              error!(
                asset = %self.settings.crypto_asset,
                spent = %fiat,
                "Crypto stage timed out, an order may be live on the exchange"
              );
            }
            PipelineState::failed(e)
          }
        }
      }

      PipelineState::BuyingTicket { quote, order } => {
        let crypto_amount = self.settings.ticket_amount_source.select(&quote, &order);
        let result = self
          .timed(
            Stage::BuyingTicket,
            self.ticket.buy_ticket(
              crypto_amount,
              &self.settings.crypto_asset,
              &self.settings.ticket_id,
            ),
          )
          .await;

        match result {
          Ok(ticket) => {
            info!(
              tx_hash = %ticket.transaction_hash,
              ticket_id = %ticket.ticket_id,
              %crypto_amount,
              "Ticket purchased"
            );
            PipelineState::Done(PurchaseReceipt {
              run_id,
              quote,
              order,
              ticket,
              completed_at: Utc::now(),
            })
          }
          Err(e) => {
            // The crypto order stands; this line is the reconciliation record.
            error!(
              order_id = %order.order_id,
              quantity = %order.quantity,
              "Ticket purchase failed after crypto order was placed"
            );
            PipelineState::failed(e)
          }
        }
      }

      terminal @ (PipelineState::Done(_) | PipelineState::Failed { .. }) => terminal,
    }
  }

  /// Await one stage under the stage timeout, recording its duration.
  async fn timed<T, E, F>(&self, stage: Stage, stage_call: F) -> Result<T, PipelineError>
  where
    F: Future<Output = Result<T, E>>,
    PipelineError: From<E>,
  {
    let started = Instant::now();
    let outcome = tokio::time::timeout(self.settings.stage_timeout, stage_call).await;
    self.metrics.observe_stage(stage, started.elapsed());

    match outcome {
      Ok(result) => result.map_err(PipelineError::from),
      Err(_) => Err(PipelineError::StageTimeout {
        stage,
        timeout_ms: u64::try_from(self.settings.stage_timeout.as_millis()).unwrap_or(u64::MAX),
      }),
    }
  }
}
