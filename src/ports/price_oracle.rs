//! Market Price Oracle Port - Crypto Spot Prices

use async_trait::async_trait;

use crate::domain::error::PriceUnavailableError;
use crate::domain::purchase::{AssetSymbol, CurrencyCode, SpotPrice};

/// Reads the current market price of a crypto asset.
#[async_trait]
pub trait PriceOracle: Send + Sync + 'static {
  /// Current spot price of `asset` denominated in `quote`.
  ///
  /// # Errors
  /// Returns `PriceUnavailableError` when the call fails or the price
  /// is missing, non-numeric, or not positive.
  async fn spot_price(
    &self,
    asset: &AssetSymbol,
    quote: &CurrencyCode,
  ) -> Result<SpotPrice, PriceUnavailableError>;
}
