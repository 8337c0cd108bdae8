//! Payment capability used by the checkout flow.
//!
//! The flow only knows how to ask for a charge and what a confirmation looks
//! like. Whether the charge hits a real gateway or a timer is the storefront's
//! business.

use core::fmt;
use core::future::Future;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Delivery estimate quoted on every confirmation.
pub const ESTIMATED_DELIVERY: &str = "3-5 business days";

/// Order number shown to the shopper, rendered as `#ETH-{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(u32);

impl OrderNumber {
    /// Create an order number.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Get the underlying number.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#ETH-{}", self.0)
    }
}

/// Proof that a charge went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub order_number: OrderNumber,
    /// The amount that was charged.
    pub amount: Price,
    pub estimated_delivery: String,
}

impl Confirmation {
    /// Confirmation with the standard delivery estimate.
    #[must_use]
    pub fn new(order_number: OrderNumber, amount: Price) -> Self {
        Self {
            order_number,
            amount,
            estimated_delivery: ESTIMATED_DELIVERY.to_string(),
        }
    }
}

/// Errors a payment processor can report.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// The card was declined.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// The processor could not be reached or failed internally.
    #[error("Payment processor unavailable: {0}")]
    Unavailable(String),
}

/// Something that can charge an amount.
///
/// The checkout state machine is written against this trait only, so a real
/// gateway can replace the simulated one without touching the flow.
pub trait PaymentProcessor: Send + Sync {
    /// Charge `amount` and return a confirmation.
    fn charge(&self, amount: Price)
    -> impl Future<Output = Result<Confirmation, PaymentError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_display() {
        assert_eq!(OrderNumber::new(42).to_string(), "#ETH-42");
        assert_eq!(OrderNumber::new(9999).to_string(), "#ETH-9999");
    }

    #[test]
    fn test_confirmation_uses_standard_estimate() {
        let confirmation = Confirmation::new(OrderNumber::new(1), Price::usd_cents(100));
        assert_eq!(confirmation.estimated_delivery, "3-5 business days");
        assert_eq!(confirmation.amount.display(), "$1.00");
    }
}
