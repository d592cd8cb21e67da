//! REST Adapter Tests - Wire Contracts Against a Local Mock Server
//!
//! Each adapter is pointed at a wiremock server and checked for the
//! request it sends and how it reads (or rejects) the response.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nft_ticket_purchaser::adapters::api::{
    ApiAuth, ApiClient, ApiClientConfig, BinanceCryptoPurchaser, BinancePriceOracle,
    MarketSymbols, MarketplaceTicketPurchaser, WiseRateConverter,
};
use nft_ticket_purchaser::domain::error::{
    ConversionError, CryptoPurchaseError, InvalidOrderSizeError, OrderRejectedError,
    PriceUnavailableError, TicketPurchaseError, TransportError,
};
use nft_ticket_purchaser::domain::purchase::{AssetSymbol, CurrencyCode, FiatAmount};
use nft_ticket_purchaser::domain::sizing::OrderSizer;
use nft_ticket_purchaser::ports::{CryptoPurchaser, PriceOracle, RateConverter, TicketPurchaser};

// ---- Helpers ----

fn client(server: &MockServer, service: &'static str, auth: ApiAuth) -> Arc<ApiClient> {
    client_with_timeout(server, service, auth, Duration::from_secs(5))
}

fn client_with_timeout(
    server: &MockServer,
    service: &'static str,
    auth: ApiAuth,
    timeout: Duration,
) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(service, auth, ApiClientConfig::new(&server.uri(), timeout)).unwrap())
}

fn idr() -> CurrencyCode {
    CurrencyCode::new("IDR").unwrap()
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD").unwrap()
}

fn btc() -> AssetSymbol {
    AssetSymbol::new("BTC").unwrap()
}

fn symbols() -> MarketSymbols {
    MarketSymbols::new(HashMap::from([("USD".to_string(), "USDT".to_string())]))
}

async fn mount_ticker(server: &MockServer, price: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"symbol": "BTCUSDT", "price": price})),
        )
        .mount(server)
        .await;
}

fn purchaser(server: &MockServer) -> BinanceCryptoPurchaser {
    let oracle = Arc::new(BinancePriceOracle::new(
        client(server, "binance-ticker", ApiAuth::None),
        symbols(),
    ));
    BinanceCryptoPurchaser::new(
        client(server, "binance", ApiAuth::binance_key("binance-key")),
        oracle,
        OrderSizer::default(),
        symbols(),
    )
}

// ---- Rate Converter ----

#[tokio::test]
async fn test_quote_request_and_target_amount() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quotes"))
        .and(header("authorization", "Bearer wise-key"))
        .and(body_json(json!({
            "sourceCurrency": "IDR",
            "targetCurrency": "USD",
            "sourceAmount": 1500000.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"targetAmount": 95.0})))
        .expect(1)
        .mount(&server)
        .await;

    let converter = WiseRateConverter::new(client(&server, "wise", ApiAuth::bearer("wise-key")));
    let quote = converter.convert(dec!(1500000), &idr(), &usd()).await.unwrap();

    assert_eq!(quote.target_amount, dec!(95));
    assert_eq!(quote.target_currency, usd());
}

#[tokio::test]
async fn test_quote_without_target_amount_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rate": 0.0000633})))
        .mount(&server)
        .await;

    let converter = WiseRateConverter::new(client(&server, "wise", ApiAuth::bearer("k")));
    let err = converter.convert(dec!(1500000), &idr(), &usd()).await.unwrap_err();

    assert!(matches!(err, ConversionError::MissingTargetAmount));
}

#[tokio::test]
async fn test_quote_with_string_target_amount_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"targetAmount": "95"})))
        .mount(&server)
        .await;

    let converter = WiseRateConverter::new(client(&server, "wise", ApiAuth::bearer("k")));
    let err = converter.convert(dec!(1500000), &idr(), &usd()).await.unwrap_err();

    assert!(matches!(err, ConversionError::MissingTargetAmount));
}

#[tokio::test]
async fn test_quote_non_success_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quotes"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let converter = WiseRateConverter::new(client(&server, "wise", ApiAuth::bearer("")));
    let err = converter.convert(dec!(1500000), &idr(), &usd()).await.unwrap_err();

    let ConversionError::Transport(TransportError::Status { status, body, .. }) = err else {
        panic!("expected status error, got {err:?}");
    };
    assert_eq!(status, 401);
    assert_eq!(body, "invalid token");
}

#[tokio::test]
async fn test_quote_undecodable_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let converter = WiseRateConverter::new(client(&server, "wise", ApiAuth::bearer("k")));
    let err = converter.convert(dec!(1500000), &idr(), &usd()).await.unwrap_err();

    assert!(matches!(err, ConversionError::Transport(TransportError::Decode { .. })));
}

#[tokio::test]
async fn test_slow_quote_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quotes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"targetAmount": 95.0}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let converter = WiseRateConverter::new(client_with_timeout(
        &server,
        "wise",
        ApiAuth::bearer("k"),
        Duration::from_millis(50),
    ));
    let err = converter.convert(dec!(1500000), &idr(), &usd()).await.unwrap_err();

    assert!(matches!(
        err,
        ConversionError::Transport(TransportError::Timeout { timeout_ms: 50, .. })
    ));
}

// ---- Price Oracle ----

#[tokio::test]
async fn test_ticker_price_parsed_from_string() {
    let server = MockServer::start().await;
    mount_ticker(&server, "50000.00").await;

    let oracle = BinancePriceOracle::new(client(&server, "binance-ticker", ApiAuth::None), symbols());
    let spot = oracle.spot_price(&btc(), &usd()).await.unwrap();

    assert_eq!(spot.price, dec!(50000));
    assert_eq!(spot.asset, btc());
}

#[tokio::test]
async fn test_ticker_garbage_price_fails() {
    let server = MockServer::start().await;
    mount_ticker(&server, "n/a").await;

    let oracle = BinancePriceOracle::new(client(&server, "binance-ticker", ApiAuth::None), symbols());
    let err = oracle.spot_price(&btc(), &usd()).await.unwrap_err();

    assert!(matches!(err, PriceUnavailableError::NonNumericPrice(_)));
}

// ---- Crypto Purchaser ----

#[tokio::test]
async fn test_market_buy_sized_from_spot_price() {
    let server = MockServer::start().await;
    mount_ticker(&server, "50000.00").await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .and(header("X-MBX-APIKEY", "binance-key"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("side", "BUY"))
        .and(query_param("type", "MARKET"))
        .and(query_param("quantity", "0.001900"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderId": 12345})))
        .expect(1)
        .mount(&server)
        .await;

    let order = purchaser(&server)
        .buy(&FiatAmount::new(dec!(95), usd()), &btc())
        .await
        .unwrap();

    assert_eq!(order.order_id, "12345");
    assert_eq!(order.quantity, dec!(0.0019));
    assert_eq!(order.spot_price, dec!(50000));
}

#[tokio::test]
async fn test_string_order_id_is_kept_verbatim() {
    let server = MockServer::start().await;
    mount_ticker(&server, "50000.00").await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderId": "A-77"})))
        .mount(&server)
        .await;

    let order = purchaser(&server)
        .buy(&FiatAmount::new(dec!(95), usd()), &btc())
        .await
        .unwrap();

    assert_eq!(order.order_id, "A-77");
}

#[tokio::test]
async fn test_exchange_error_body_becomes_rejection() {
    let server = MockServer::start().await;
    mount_ticker(&server, "50000.00").await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": -2010,
            "msg": "Account has insufficient balance for requested action."
        })))
        .mount(&server)
        .await;

    let err = purchaser(&server)
        .buy(&FiatAmount::new(dec!(95), usd()), &btc())
        .await
        .unwrap_err();

    let CryptoPurchaseError::Rejected(OrderRejectedError::Exchange { code, msg }) = err else {
        panic!("expected exchange rejection, got {err:?}");
    };
    assert_eq!(code, -2010);
    assert!(msg.contains("insufficient balance"));
}

#[tokio::test]
async fn test_missing_order_id_is_rejection() {
    let server = MockServer::start().await;
    mount_ticker(&server, "50000.00").await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "FILLED"})))
        .mount(&server)
        .await;

    let err = purchaser(&server)
        .buy(&FiatAmount::new(dec!(95), usd()), &btc())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CryptoPurchaseError::Rejected(OrderRejectedError::MissingOrderId)
    ));
}

#[tokio::test]
async fn test_dust_amount_never_reaches_order_endpoint() {
    let server = MockServer::start().await;
    mount_ticker(&server, "50000.00").await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderId": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let err = purchaser(&server)
        .buy(&FiatAmount::new(dec!(0.00001), usd()), &btc())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CryptoPurchaseError::Size(InvalidOrderSizeError::BelowLotSize { .. })
    ));
}

#[tokio::test]
async fn test_unavailable_price_never_reaches_order_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderId": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let err = purchaser(&server)
        .buy(&FiatAmount::new(dec!(95), usd()), &btc())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CryptoPurchaseError::Price(PriceUnavailableError::Transport(_))
    ));
}

// ---- Ticket Purchaser ----

#[tokio::test]
async fn test_ticket_purchase_returns_transaction_hash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/buy_ticket"))
        .and(header("authorization", "Bearer market-key"))
        .and(body_json(json!({
            "cryptoAmount": 95.0,
            "cryptoCurrency": "BTC",
            "nftId": "TICKET_NFT_ID"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"transactionHash": "0xabc"})))
        .expect(1)
        .mount(&server)
        .await;

    let marketplace =
        MarketplaceTicketPurchaser::new(client(&server, "marketplace", ApiAuth::bearer("market-key")));
    let ticket = marketplace
        .buy_ticket(dec!(95), &btc(), "TICKET_NFT_ID")
        .await
        .unwrap();

    assert_eq!(ticket.transaction_hash, "0xabc");
    assert_eq!(ticket.ticket_id, "TICKET_NFT_ID");
}

#[tokio::test]
async fn test_empty_transaction_hash_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/buy_ticket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"transactionHash": ""})))
        .mount(&server)
        .await;

    let marketplace =
        MarketplaceTicketPurchaser::new(client(&server, "marketplace", ApiAuth::bearer("k")));
    let err = marketplace
        .buy_ticket(dec!(95), &btc(), "TICKET_NFT_ID")
        .await
        .unwrap_err();

    assert!(matches!(err, TicketPurchaseError::MissingTransactionHash));
}
