//! Domain layer - purchase entities, order sizing and errors.
//!
//! Pure data and arithmetic: no I/O, no HTTP types. Everything the
//! pipeline passes between stages is defined here.

pub mod error;
pub mod purchase;
pub mod sizing;

// Re-export core types for convenience
pub use error::{
    ConversionError, CryptoPurchaseError, InvalidOrderSizeError, OrderRejectedError,
    PipelineError, PriceUnavailableError, Stage, TicketPurchaseError, TransportError,
    ValidationError,
};
pub use purchase::{
    AssetSymbol, ConversionQuote, CryptoOrder, CurrencyCode, FiatAmount, OrderSide, OrderType,
    PurchaseReceipt, PurchaseRequest, SpotPrice, TicketAmountSource, TicketPurchase,
};
pub use sizing::OrderSizer;
