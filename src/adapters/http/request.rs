//! Trigger request parsing.
//!
//! The body must be a JSON object carrying the amount under
//! `amount<SOURCE>` (e.g. `amountIDR`) as a positive JSON number.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::adapters::api::types::decimal_from_number;
use crate::domain::error::ValidationError;
use crate::domain::purchase::CurrencyCode;

/// Name of the amount field for a source currency.
pub fn amount_field(source_currency: &CurrencyCode) -> String {
  format!("amount{source_currency}")
}

/// Extract the positive source amount from a raw trigger body.
pub fn parse_amount(body: &[u8], field: &str) -> Result<Decimal, ValidationError> {
  let value: Value =
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

  let Value::Object(fields) = value else {
    return Err(ValidationError::MalformedBody("expected a JSON object".to_string()));
  };

  let raw = fields.get(field).ok_or(ValidationError::MissingAmount)?;
  let amount = decimal_from_number(raw).ok_or(ValidationError::NonNumericAmount)?;

  if amount <= Decimal::ZERO {
    return Err(ValidationError::NonPositiveAmount(amount));
  }
  Ok(amount)
}
