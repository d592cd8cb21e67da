//! Remote API Request/Response Types
//!
//! Serialization types and JSON field helpers for the quoting
//! service, the exchange and the NFT marketplace. Responses are read
//! field by field from `serde_json::Value` so that a missing or
//! mistyped field maps to the stage's own error instead of a generic
//! decode failure.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Quote request body (`POST /v1/quotes`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest<'a> {
    pub source_currency: &'a str,
    pub target_currency: &'a str,
    /// Sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub source_amount: Decimal,
}

/// Ticket purchase body (`POST /buy_ticket`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyTicketRequest<'a> {
    /// Sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub crypto_amount: Decimal,
    pub crypto_currency: &'a str,
    pub nft_id: &'a str,
}

/// Exchange error payload (`{"code": -2015, "msg": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeErrorBody {
    pub code: i64,
    pub msg: String,
}

impl ExchangeErrorBody {
    /// Parse an error body, if it has the exchange's shape.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// Read a JSON number as an exact decimal.
///
/// Strings are rejected: the quoting service returns numbers, and a
/// quoted value there means the response is not what we expect.
pub fn decimal_from_number(value: &Value) -> Option<Decimal> {
    let Value::Number(n) = value else {
        return None;
    };
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Read an identifier that may arrive as a string or an integer.
pub fn opaque_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Read a non-empty string field.
pub fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}
