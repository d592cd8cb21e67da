//! Remote Service API Adapters
//!
//! HTTP adapters for the three remote services the purchase
//! pipeline depends on. Each implements one port trait.
//!
//! Sub-modules:
//! - `auth`: per-service credential schemes
//! - `client`: shared JSON HTTP client (timeout, no retry)
//! - `quotes`: Wise fiat quotes (`RateConverter`)
//! - `ticker`: Binance spot prices (`PriceOracle`)
//! - `orders`: Binance market buys (`CryptoPurchaser`)
//! - `marketplace`: NFT ticket purchase (`TicketPurchaser`)
//! - `types`: request bodies and JSON field helpers

pub mod auth;
pub mod client;
pub mod marketplace;
pub mod orders;
pub mod quotes;
pub mod ticker;
pub mod types;

pub use auth::ApiAuth;
pub use client::{ApiClient, ApiClientConfig};
pub use marketplace::MarketplaceTicketPurchaser;
pub use orders::BinanceCryptoPurchaser;
pub use quotes::WiseRateConverter;
pub use ticker::{BinancePriceOracle, MarketSymbols};
