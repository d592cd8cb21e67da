//! Market order sizing.
//!
//! Converts a fiat budget into an order quantity at the exchange's
//! lot granularity: `quantity = amount / price`, rounded to
//! `decimals` places. Zero prices, overflowing divisions and
//! quantities that round to zero are rejected before any order
//! reaches the exchange.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::InvalidOrderSizeError;

/// Default lot granularity (6 decimal places).
pub const DEFAULT_LOT_DECIMALS: u32 = 6;

/// Sizes market orders from a fiat amount and a spot price.
#[derive(Debug, Clone, Copy)]
pub struct OrderSizer {
    /// Decimal places of the exchange's minimum lot size.
    decimals: u32,
}

impl Default for OrderSizer {
    fn default() -> Self {
        Self::new(DEFAULT_LOT_DECIMALS)
    }
}

impl OrderSizer {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Compute the order quantity for spending `amount` at `price`.
    ///
    /// The result carries exactly `decimals` fractional digits, so its
    /// `Display` form is the wire format (`0.001900`, not `0.0019`).
    /// Midpoints round to even.
    pub fn quantity(&self, amount: Decimal, price: Decimal) -> Result<Decimal, InvalidOrderSizeError> {
        if amount <= Decimal::ZERO {
            return Err(InvalidOrderSizeError::NonPositiveAmount(amount));
        }
        if price <= Decimal::ZERO {
            return Err(InvalidOrderSizeError::NonPositivePrice(price));
        }

        let raw = amount
            .checked_div(price)
            .ok_or(InvalidOrderSizeError::Overflow { amount, price })?;

        let mut quantity =
            raw.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointNearestEven);
        if quantity.is_zero() {
            return Err(InvalidOrderSizeError::BelowLotSize {
                amount,
                price,
                decimals: self.decimals,
            });
        }

        // rescale keeps a smaller scale when the mantissa would overflow
        quantity.rescale(self.decimals);
        if quantity.scale() != self.decimals {
            return Err(InvalidOrderSizeError::Overflow { amount, price });
        }
        Ok(quantity)
    }
}
