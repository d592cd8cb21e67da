//! Rate Converter Port - Fiat Currency Conversion
//!
//! The remote quoting service is authoritative for the exchange
//! rate: there is no local rate table and no caching.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::error::ConversionError;
use crate::domain::purchase::{ConversionQuote, CurrencyCode};

/// Converts an amount between fiat currencies via a quoting service.
#[async_trait]
pub trait RateConverter: Send + Sync + 'static {
  /// Quote `amount` of `from` in `to`.
  ///
  /// Issues exactly one remote request. Never retries.
  ///
  /// # Errors
  /// Returns `ConversionError` when the call fails, the service answers
  /// with a non-success status, or the quote has no numeric target amount.
  async fn convert(
    &self,
    amount: Decimal,
    from: &CurrencyCode,
    to: &CurrencyCode,
  ) -> Result<ConversionQuote, ConversionError>;
}
