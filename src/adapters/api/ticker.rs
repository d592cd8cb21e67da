//! Binance Ticker Adapter - Spot Price Oracle
//!
//! Implements the `PriceOracle` port with the public
//! `/api/v3/ticker/price` endpoint. The exchange lists fiat pairs
//! against stablecoins, so the fiat code is mapped to the exchange's
//! quote asset first (USD -> USDT gives `BTCUSDT`).

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::client::ApiClient;
use crate::domain::error::PriceUnavailableError;
use crate::domain::purchase::{AssetSymbol, CurrencyCode, SpotPrice};
use crate::ports::price_oracle::PriceOracle;

/// Ticker endpoint path.
const TICKER_PATH: &str = "/api/v3/ticker/price";

/// Maps fiat currencies to exchange market symbols.
#[derive(Debug, Clone, Default)]
pub struct MarketSymbols {
    /// Fiat code -> exchange quote asset.
    quote_aliases: HashMap<String, String>,
}

impl MarketSymbols {
    pub fn new(quote_aliases: HashMap<String, String>) -> Self {
        Self { quote_aliases }
    }

    /// Exchange pair for `asset` quoted in `fiat` (e.g. `BTCUSDT`).
    ///
    /// Fiat codes without an alias are used verbatim.
    pub fn pair(&self, asset: &AssetSymbol, fiat: &CurrencyCode) -> String {
        let quote = self
            .quote_aliases
            .get(fiat.as_str())
            .map(String::as_str)
            .unwrap_or(fiat.as_str());
        format!("{asset}{quote}")
    }
}

/// Spot price oracle backed by the Binance ticker.
pub struct BinancePriceOracle {
    client: Arc<ApiClient>,
    symbols: MarketSymbols,
}

impl BinancePriceOracle {
    pub fn new(client: Arc<ApiClient>, symbols: MarketSymbols) -> Self {
        Self { client, symbols }
    }
}

#[async_trait]
impl PriceOracle for BinancePriceOracle {
    #[instrument(skip(self, asset, quote), fields(asset = %asset, quote = %quote))]
    async fn spot_price(
        &self,
        asset: &AssetSymbol,
        quote: &CurrencyCode,
    ) -> Result<SpotPrice, PriceUnavailableError> {
        let symbol = self.symbols.pair(asset, quote);
        let response = self
            .client
            .get(TICKER_PATH, &[("symbol", symbol.clone())])
            .await?;

        let raw = response["price"]
            .as_str()
            .ok_or(PriceUnavailableError::MissingPrice)?;
        let price = Decimal::from_str(raw.trim())
            .map_err(|_| PriceUnavailableError::NonNumericPrice(raw.to_string()))?;
        if price <= Decimal::ZERO {
            return Err(PriceUnavailableError::NonPositivePrice(price));
        }

        debug!(%symbol, %price, "Spot price fetched");

        Ok(SpotPrice {
            asset: asset.clone(),
            quote_currency: quote.clone(),
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_uses_quote_alias() {
        let symbols = MarketSymbols::new(HashMap::from([(
            "USD".to_string(),
            "USDT".to_string(),
        )]));
        let btc = AssetSymbol::new("BTC").unwrap();

        assert_eq!(symbols.pair(&btc, &CurrencyCode::new("USD").unwrap()), "BTCUSDT");
        assert_eq!(symbols.pair(&btc, &CurrencyCode::new("EUR").unwrap()), "BTCEUR");
    }
}
