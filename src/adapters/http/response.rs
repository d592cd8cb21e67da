//! Trigger response mapping.
//!
//! Success is a small JSON document. Failures are flat text bodies,
//! one per failing stage, with no structured error code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::error::{PipelineError, Stage};
use crate::domain::purchase::{CurrencyCode, PurchaseReceipt};

/// Body returned after a ticket was bought.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse<'a> {
  pub success: bool,
  pub transaction_hash: &'a str,
}

impl<'a> From<&'a PurchaseReceipt> for PurchaseResponse<'a> {
  fn from(receipt: &'a PurchaseReceipt) -> Self {
    Self {
      success: true,
      transaction_hash: receipt.transaction_hash(),
    }
  }
}

/// Caller-facing failure texts, built once from the configured currencies.
#[derive(Debug, Clone)]
pub struct FailureMessages {
  pub method_not_allowed: String,
  pub unreadable_body: String,
  pub invalid_amount: String,
  pub conversion: String,
  pub crypto_purchase: String,
  pub ticket_purchase: String,
}

impl FailureMessages {
  pub fn new(source: &CurrencyCode, target: &CurrencyCode, amount_field: &str) -> Self {
    Self {
      method_not_allowed: "Invalid request method".to_string(),
      unreadable_body: "Error reading request body".to_string(),
      invalid_amount: format!("Invalid {amount_field}"),
      conversion: format!("Error converting {source} to {target}"),
      crypto_purchase: "Error buying crypto on Binance".to_string(),
      ticket_purchase: "Error purchasing NFT ticket".to_string(),
    }
  }

  /// Status and text for a failed run.
  pub fn for_error(&self, error: &PipelineError) -> (StatusCode, String) {
    let text = match error.stage() {
      Stage::Validating => return (StatusCode::BAD_REQUEST, self.invalid_amount.clone()),
      Stage::Converting => &self.conversion,
      Stage::BuyingCrypto => &self.crypto_purchase,
      Stage::BuyingTicket => &self.ticket_purchase,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, text.clone())
  }
}

pub fn success(receipt: &PurchaseReceipt) -> Response {
  (StatusCode::OK, Json(PurchaseResponse::from(receipt))).into_response()
}

pub fn failure(messages: &FailureMessages, error: &PipelineError) -> Response {
  messages.for_error(error).into_response()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::error::{
    ConversionError, CryptoPurchaseError, InvalidOrderSizeError, OrderRejectedError,
    TicketPurchaseError, ValidationError,
  };
  use rust_decimal_macros::dec;

  fn messages() -> FailureMessages {
    FailureMessages::new(
      &CurrencyCode::new("IDR").unwrap(),
      &CurrencyCode::new("USD").unwrap(),
      "amountIDR",
    )
  }

  #[test]
  fn test_texts_match_configured_currencies() {
    let m = messages();
    assert_eq!(m.invalid_amount, "Invalid amountIDR");
    assert_eq!(m.conversion, "Error converting IDR to USD");
  }

  #[test]
  fn test_each_stage_maps_to_its_text() {
    let m = messages();

    let (status, text) = m.for_error(&ValidationError::MissingAmount.into());
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Invalid amountIDR");

    let (status, text) = m.for_error(&ConversionError::MissingTargetAmount.into());
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, "Error converting IDR to USD");

    let size = CryptoPurchaseError::from(InvalidOrderSizeError::NonPositivePrice(dec!(0)));
    assert_eq!(m.for_error(&size.into()).1, "Error buying crypto on Binance");

    let rejected = CryptoPurchaseError::from(OrderRejectedError::MissingOrderId);
    assert_eq!(m.for_error(&rejected.into()).1, "Error buying crypto on Binance");

    let ticket = PipelineError::from(TicketPurchaseError::MissingTransactionHash);
    assert_eq!(m.for_error(&ticket).1, "Error purchasing NFT ticket");
  }

  #[test]
  fn test_timeout_maps_to_stage_text() {
    let timeout = PipelineError::StageTimeout {
      stage: Stage::BuyingTicket,
      timeout_ms: 10,
    };
    let (status, text) = messages().for_error(&timeout);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, "Error purchasing NFT ticket");
  }
}
