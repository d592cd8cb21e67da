//! Ticket Purchaser Port - NFT Ticket Marketplace

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::error::TicketPurchaseError;
use crate::domain::purchase::{AssetSymbol, TicketPurchase};

/// Buys a specific NFT ticket with crypto.
#[async_trait]
pub trait TicketPurchaser: Send + Sync + 'static {
  /// Spend `crypto_amount` of `crypto_currency` on ticket `ticket_id`.
  ///
  /// # Errors
  /// Returns `TicketPurchaseError` when the call fails, the marketplace
  /// answers with a non-success status, or no transaction hash comes back.
  async fn buy_ticket(
    &self,
    crypto_amount: Decimal,
    crypto_currency: &AssetSymbol,
    ticket_id: &str,
  ) -> Result<TicketPurchase, TicketPurchaseError>;
}
