//! Binance Order Adapter - Market Buys Sized in Fiat
//!
//! Implements the `CryptoPurchaser` port: prices the asset through
//! the `PriceOracle` port, sizes the order with `OrderSizer`, then
//! submits a MARKET BUY to `/api/v3/order`. Sizing failures stop the
//! purchase before anything reaches the exchange.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;
use super::ticker::MarketSymbols;
use super::types::{ExchangeErrorBody, opaque_id};
use crate::domain::error::{CryptoPurchaseError, OrderRejectedError, TransportError};
use crate::domain::purchase::{AssetSymbol, CryptoOrder, FiatAmount, OrderSide, OrderType};
use crate::domain::sizing::OrderSizer;
use crate::ports::crypto_purchaser::CryptoPurchaser;
use crate::ports::price_oracle::PriceOracle;

/// Order endpoint path.
const ORDER_PATH: &str = "/api/v3/order";

/// Crypto purchaser placing market orders on Binance.
pub struct BinanceCryptoPurchaser {
    /// Authenticated exchange client.
    client: Arc<ApiClient>,
    /// Spot price source used for sizing.
    oracle: Arc<dyn PriceOracle>,
    /// Lot-size rounding.
    sizer: OrderSizer,
    /// Fiat -> market symbol mapping.
    symbols: MarketSymbols,
}

impl BinanceCryptoPurchaser {
    pub fn new(
        client: Arc<ApiClient>,
        oracle: Arc<dyn PriceOracle>,
        sizer: OrderSizer,
        symbols: MarketSymbols,
    ) -> Self {
        Self {
            client,
            oracle,
            sizer,
            symbols,
        }
    }

    /// Turn a failed order call into a rejection, keeping the
    /// exchange's own code and message when it sent one.
    fn rejection(err: TransportError) -> OrderRejectedError {
        if let TransportError::Status { body, .. } = &err {
            if let Some(ExchangeErrorBody { code, msg }) = ExchangeErrorBody::parse(body) {
                warn!(status = ?err.status(), code = %code, msg = %msg, "Exchange rejected order");
                return OrderRejectedError::Exchange { code, msg };
            }
        }
        OrderRejectedError::Transport(err)
    }
}

#[async_trait]
impl CryptoPurchaser for BinanceCryptoPurchaser {
    #[instrument(skip(self, fiat, asset), fields(fiat = %fiat, asset = %asset))]
    async fn buy(
        &self,
        fiat: &FiatAmount,
        asset: &AssetSymbol,
    ) -> Result<CryptoOrder, CryptoPurchaseError> {
        let spot = self.oracle.spot_price(asset, &fiat.currency).await?;
        let quantity = self.sizer.quantity(fiat.amount, spot.price)?;

        info!(
            price = %spot.price,
            %quantity,
            lot_decimals = self.sizer.decimals(),
            "Order sized, submitting market buy"
        );

        let side = OrderSide::Buy;
        let order_type = OrderType::Market;
        let query = [
            ("symbol", self.symbols.pair(asset, &fiat.currency)),
            ("side", side.to_string()),
            ("type", order_type.to_string()),
            ("quantity", quantity.to_string()),
        ];

        let response = self
            .client
            .post_query(ORDER_PATH, &query)
            .await
            .map_err(Self::rejection)?;
        debug!(response = %response, "Order response");

        let Some(order_id) = opaque_id(&response["orderId"]) else {
            warn!("Order response carried no orderId");
            return Err(OrderRejectedError::MissingOrderId.into());
        };

        Ok(CryptoOrder {
            asset: asset.clone(),
            side,
            order_type,
            quantity,
            spot_price: spot.price,
            order_id,
        })
    }
}
