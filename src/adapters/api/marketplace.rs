//! NFT Marketplace Adapter - Ticket Purchase
//!
//! Implements the `TicketPurchaser` port with a single
//! `POST /buy_ticket`. The returned `transactionHash` is the proof of
//! purchase handed back to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::client::ApiClient;
use super::types::{BuyTicketRequest, non_empty_str};
use crate::domain::error::TicketPurchaseError;
use crate::domain::purchase::{AssetSymbol, TicketPurchase};
use crate::ports::ticket_purchaser::TicketPurchaser;

/// Ticket purchase endpoint path.
const BUY_TICKET_PATH: &str = "/buy_ticket";

/// Ticket purchaser backed by the NFT marketplace API.
pub struct MarketplaceTicketPurchaser {
    client: Arc<ApiClient>,
}

impl MarketplaceTicketPurchaser {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TicketPurchaser for MarketplaceTicketPurchaser {
    #[instrument(skip(self, crypto_currency), fields(currency = %crypto_currency))]
    async fn buy_ticket(
        &self,
        crypto_amount: Decimal,
        crypto_currency: &AssetSymbol,
        ticket_id: &str,
    ) -> Result<TicketPurchase, TicketPurchaseError> {
        let body = BuyTicketRequest {
            crypto_amount,
            crypto_currency: crypto_currency.as_str(),
            nft_id: ticket_id,
        };

        let response = self.client.post_json(BUY_TICKET_PATH, &body).await?;

        let transaction_hash = non_empty_str(&response["transactionHash"])
            .ok_or(TicketPurchaseError::MissingTransactionHash)?
            .to_string();

        info!(service = self.client.service(), tx_hash = %transaction_hash, "Ticket purchased");

        Ok(TicketPurchase {
            crypto_amount,
            crypto_currency: crypto_currency.clone(),
            ticket_id: ticket_id.to_string(),
            transaction_hash,
        })
    }
}
