//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) the purchase pipeline requires
//! from the outside world. Adapters implement these traits; tests
//! substitute deterministic fakes.
//!
//! One port per remote stage, one method each:
//! - `RateConverter`: fiat to fiat conversion quote
//! - `PriceOracle`: crypto spot price in a fiat currency
//! - `CryptoPurchaser`: market buy sized from a fiat amount
//! - `TicketPurchaser`: NFT ticket purchase paid in crypto

pub mod crypto_purchaser;
pub mod price_oracle;
pub mod rate_converter;
pub mod ticket_purchaser;

pub use crypto_purchaser::CryptoPurchaser;
pub use price_oracle::PriceOracle;
pub use rate_converter::RateConverter;
pub use ticket_purchaser::TicketPurchaser;
