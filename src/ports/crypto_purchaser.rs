//! Crypto Purchaser Port - Market Buys Sized in Fiat
//!
//! Implementations price the asset in the fiat currency of the
//! budget, size the order at lot granularity and submit a market
//! buy. A placed order is never cancelled by the pipeline, even if
//! a later stage fails.

use async_trait::async_trait;

use crate::domain::error::CryptoPurchaseError;
use crate::domain::purchase::{AssetSymbol, CryptoOrder, FiatAmount};

/// Places market buy orders for a crypto asset.
#[async_trait]
pub trait CryptoPurchaser: Send + Sync + 'static {
  /// Spend `fiat` on `asset` at market.
  ///
  /// # Errors
  /// - `CryptoPurchaseError::Price` if no usable spot price is available
  /// - `CryptoPurchaseError::Size` if the quantity cannot be computed
  ///   (checked before anything is submitted)
  /// - `CryptoPurchaseError::Rejected` if the exchange does not accept
  ///   the order or returns no order id
  async fn buy(
    &self,
    fiat: &FiatAmount,
    asset: &AssetSymbol,
  ) -> Result<CryptoOrder, CryptoPurchaseError>;
}
