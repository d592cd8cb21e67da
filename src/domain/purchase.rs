//! Purchase pipeline entities.
//!
//! Every entity here is produced by exactly one pipeline stage and
//! consumed by the next. None of them is mutated after construction
//! and none outlives a single pipeline run.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

// ────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────

/// ISO-style fiat currency code (three uppercase ASCII letters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and validate a currency code.
    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let valid = code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase());
        if !valid {
            return Err(ValidationError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Crypto asset ticker symbol (e.g. `BTC`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Maximum accepted symbol length.
    const MAX_LEN: usize = 10;

    /// Parse and validate an asset symbol.
    pub fn new(symbol: &str) -> Result<Self, ValidationError> {
        let valid = !symbol.is_empty()
            && symbol.len() <= Self::MAX_LEN
            && symbol
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            return Err(ValidationError::InvalidAsset(symbol.to_string()));
        }
        Ok(Self(symbol.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetSymbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<AssetSymbol> for String {
    fn from(symbol: AssetSymbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────
// Stage inputs and outputs
// ────────────────────────────────────────────

/// A positive amount of a specific fiat currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiatAmount {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl FiatAmount {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for FiatAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Inbound request to spend `source_amount` of `source_currency`.
///
/// Built by the request front end from the trigger payload. The
/// constructor rejects non-positive amounts, so a `PurchaseRequest`
/// that exists is always safe to hand to the rate converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRequest {
    source_amount: Decimal,
    source_currency: CurrencyCode,
    target_currency: CurrencyCode,
}

impl PurchaseRequest {
    pub fn new(
        source_amount: Decimal,
        source_currency: CurrencyCode,
        target_currency: CurrencyCode,
    ) -> Result<Self, ValidationError> {
        if source_amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(source_amount));
        }
        Ok(Self {
            source_amount,
            source_currency,
            target_currency,
        })
    }

    pub fn source_amount(&self) -> Decimal {
        self.source_amount
    }

    pub fn source_currency(&self) -> &CurrencyCode {
        &self.source_currency
    }

    pub fn target_currency(&self) -> &CurrencyCode {
        &self.target_currency
    }
}

/// Result of the rate conversion stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionQuote {
    /// Converted amount, authoritative as returned by the quoting service.
    pub target_amount: Decimal,
    /// Currency of `target_amount`.
    pub target_currency: CurrencyCode,
}

impl ConversionQuote {
    /// The converted amount as a fiat amount ready for crypto sizing.
    pub fn target_fiat(&self) -> FiatAmount {
        FiatAmount::new(self.target_amount, self.target_currency.clone())
    }
}

/// Current market price of `asset` denominated in `quote_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotPrice {
    pub asset: AssetSymbol,
    pub quote_currency: CurrencyCode,
    pub price: Decimal,
}

/// Order side. Only buys are ever placed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
        }
    }
}

/// Order type. Crypto is always acquired at market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// A market buy accepted by the exchange.
///
/// `order_id` is the durable evidence that the crypto stage happened;
/// it is logged for reconciliation and never reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CryptoOrder {
    pub asset: AssetSymbol,
    pub side: OrderSide,
    pub order_type: OrderType,
    /// Quantity at lot-size precision (scale fixed to the lot decimals).
    pub quantity: Decimal,
    /// Spot price the quantity was sized at.
    pub spot_price: Decimal,
    /// Opaque identifier assigned by the exchange.
    pub order_id: String,
}

/// A completed NFT ticket purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketPurchase {
    pub crypto_amount: Decimal,
    pub crypto_currency: AssetSymbol,
    pub ticket_id: String,
    /// Proof-of-purchase identifier assigned by the marketplace.
    pub transaction_hash: String,
}

/// Everything a successful pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub run_id: Uuid,
    pub quote: ConversionQuote,
    pub order: CryptoOrder,
    pub ticket: TicketPurchase,
    pub completed_at: DateTime<Utc>,
}

impl PurchaseReceipt {
    /// The proof-of-purchase identifier returned to the caller.
    pub fn transaction_hash(&self) -> &str {
        &self.ticket.transaction_hash
    }
}

/// Which amount is handed to the ticket purchase as its crypto amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAmountSource {
    /// The converted fiat amount (the amount spent on crypto).
    #[default]
    ConvertedFiat,
    /// The crypto quantity actually bought.
    CryptoQuantity,
}

impl TicketAmountSource {
    /// Pick the ticket's crypto amount from the earlier stage results.
    pub fn select(self, quote: &ConversionQuote, order: &CryptoOrder) -> Decimal {
        match self {
            Self::ConvertedFiat => quote.target_amount,
            Self::CryptoQuantity => order.quantity,
        }
    }
}
