//! Wise Quote Adapter - Fiat Rate Conversion
//!
//! Implements the `RateConverter` port against the Wise quotes API.
//! One quote request per conversion; the quoted `targetAmount` is
//! taken as-is.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use super::client::ApiClient;
use super::types::{QuoteRequest, decimal_from_number};
use crate::domain::error::ConversionError;
use crate::domain::purchase::{ConversionQuote, CurrencyCode};
use crate::ports::rate_converter::RateConverter;

/// Quote endpoint path.
const QUOTES_PATH: &str = "/v1/quotes";

/// Rate converter backed by the Wise quoting service.
pub struct WiseRateConverter {
    client: Arc<ApiClient>,
}

impl WiseRateConverter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateConverter for WiseRateConverter {
    #[instrument(skip(self, from, to), fields(from = %from, to = %to))]
    async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ConversionQuote, ConversionError> {
        let body = QuoteRequest {
            source_currency: from.as_str(),
            target_currency: to.as_str(),
            source_amount: amount,
        };

        let response = self.client.post_json(QUOTES_PATH, &body).await?;
        debug!(response = %response, "Quote response");

        let target_amount = decimal_from_number(&response["targetAmount"])
            .ok_or(ConversionError::MissingTargetAmount)?;
        if target_amount <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveTargetAmount(target_amount));
        }

        info!(service = self.client.service(), %amount, %target_amount, "Quote received");

        Ok(ConversionQuote {
            target_amount,
            target_currency: to.clone(),
        })
    }
}
