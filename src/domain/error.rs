//! Pipeline error taxonomy.
//!
//! One error type per stage, plus `TransportError` for network-level
//! failures folded into whichever stage triggered them. Every error is
//! terminal for the run that produced it: nothing here is retried.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// A discrete step of the purchase pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Inbound request validation (before any remote call).
    Validating,
    /// Fiat to fiat conversion.
    Converting,
    /// Spot price lookup, order sizing and market buy.
    BuyingCrypto,
    /// NFT ticket purchase.
    BuyingTicket,
}

impl Stage {
    /// Stable label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validation",
            Self::Converting => "conversion",
            Self::BuyingCrypto => "crypto_purchase",
            Self::BuyingTicket => "ticket_purchase",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network-level failure talking to a remote service.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced an HTTP response.
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The service answered with a non-success status.
    #[error("{endpoint} responded with HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// No response within the client timeout.
    #[error("{endpoint} did not respond within {timeout_ms} ms")]
    Timeout { endpoint: String, timeout_ms: u64 },
    /// The response body was not the JSON we can read.
    #[error("malformed response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl TransportError {
    /// HTTP status, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Bad inbound input. Surfaced to the caller as a client error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body is not a JSON object: {0}")]
    MalformedBody(String),
    #[error("amount field is missing")]
    MissingAmount,
    #[error("amount field is not a number")]
    NonNumericAmount,
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("invalid currency code {0:?}")]
    InvalidCurrency(String),
    #[error("invalid asset symbol {0:?}")]
    InvalidAsset(String),
}

/// Rate converter failure.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("quote response has no numeric targetAmount")]
    MissingTargetAmount,
    #[error("quoted target amount must be positive, got {0}")]
    NonPositiveTargetAmount(Decimal),
}

/// Market price oracle failure.
#[derive(Debug, Error)]
pub enum PriceUnavailableError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("ticker response has no price field")]
    MissingPrice,
    #[error("ticker price {0:?} is not a decimal number")]
    NonNumericPrice(String),
    #[error("ticker price must be positive, got {0}")]
    NonPositivePrice(Decimal),
}

/// The order quantity cannot be computed or is not submittable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOrderSizeError {
    #[error("fiat amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("spot price must be positive, got {0}")]
    NonPositivePrice(Decimal),
    #[error("{amount} / {price} overflows decimal precision")]
    Overflow { amount: Decimal, price: Decimal },
    #[error("{amount} / {price} rounds to zero at {decimals} decimal places")]
    BelowLotSize {
        amount: Decimal,
        price: Decimal,
        decimals: u32,
    },
}

/// The exchange did not accept the market order.
#[derive(Debug, Error)]
pub enum OrderRejectedError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("exchange rejected order (code {code}): {msg}")]
    Exchange { code: i64, msg: String },
    #[error("order response has no orderId")]
    MissingOrderId,
}

/// Anything that can stop the crypto purchase stage.
#[derive(Debug, Error)]
pub enum CryptoPurchaseError {
    #[error("spot price unavailable: {0}")]
    Price(#[from] PriceUnavailableError),
    #[error("invalid order size: {0}")]
    Size(#[from] InvalidOrderSizeError),
    #[error("order rejected: {0}")]
    Rejected(#[from] OrderRejectedError),
}

/// Ticket purchaser failure.
#[derive(Debug, Error)]
pub enum TicketPurchaseError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("marketplace response has no transactionHash")]
    MissingTransactionHash,
}

/// Terminal failure of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid purchase request: {0}")]
    Validation(#[from] ValidationError),
    #[error("currency conversion failed: {0}")]
    Conversion(#[from] ConversionError),
    #[error("spot price unavailable: {0}")]
    PriceUnavailable(#[from] PriceUnavailableError),
    #[error("invalid order size: {0}")]
    InvalidOrderSize(#[from] InvalidOrderSizeError),
    #[error("crypto order rejected: {0}")]
    OrderRejected(#[from] OrderRejectedError),
    #[error("ticket purchase failed: {0}")]
    TicketPurchase(#[from] TicketPurchaseError),
    #[error("{stage} stage did not finish within {timeout_ms} ms")]
    StageTimeout { stage: Stage, timeout_ms: u64 },
}

impl From<CryptoPurchaseError> for PipelineError {
    fn from(err: CryptoPurchaseError) -> Self {
        match err {
            CryptoPurchaseError::Price(e) => Self::PriceUnavailable(e),
            CryptoPurchaseError::Size(e) => Self::InvalidOrderSize(e),
            CryptoPurchaseError::Rejected(e) => Self::OrderRejected(e),
        }
    }
}

impl PipelineError {
    /// The stage at which the run stopped.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Validation(_) => Stage::Validating,
            Self::Conversion(_) => Stage::Converting,
            Self::PriceUnavailable(_) | Self::InvalidOrderSize(_) | Self::OrderRejected(_) => {
                Stage::BuyingCrypto
            }
            Self::TicketPurchase(_) => Stage::BuyingTicket,
            Self::StageTimeout { stage, .. } => *stage,
        }
    }

    /// Bad input rather than a downstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_crypto_errors_map_to_crypto_stage() {
        let price: PipelineError = CryptoPurchaseError::from(PriceUnavailableError::MissingPrice).into();
        assert!(matches!(price, PipelineError::PriceUnavailable(_)));
        assert_eq!(price.stage(), Stage::BuyingCrypto);

        let size: PipelineError =
            CryptoPurchaseError::from(InvalidOrderSizeError::NonPositivePrice(dec!(0))).into();
        assert!(matches!(size, PipelineError::InvalidOrderSize(_)));
        assert_eq!(size.stage(), Stage::BuyingCrypto);

        let rejected: PipelineError = CryptoPurchaseError::from(OrderRejectedError::MissingOrderId).into();
        assert_eq!(rejected.stage(), Stage::BuyingCrypto);
    }

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(PipelineError::from(ValidationError::MissingAmount).is_client_error());
        assert!(!PipelineError::from(ConversionError::MissingTargetAmount).is_client_error());
        assert!(
            !PipelineError::StageTimeout {
                stage: Stage::BuyingTicket,
                timeout_ms: 10,
            }
            .is_client_error()
        );
    }

    #[test]
    fn test_transport_status_accessor() {
        let err = TransportError::Status {
            endpoint: "POST /v1/quotes".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("HTTP 401"));
    }
}
