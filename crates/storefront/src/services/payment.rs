//! Payment gateways.
//!
//! Only a simulated gateway exists: it waits a fixed delay and approves every
//! charge with a random order number. Routes talk to [`PaymentGateway`], so a
//! real gateway is one more variant.

use std::time::Duration;

use ethos_core::Price;
use ethos_core::checkout::{Confirmation, OrderNumber, PaymentError, PaymentProcessor};
use rand::Rng;
use tracing::{info, instrument};

/// Order numbers are drawn from `0..ORDER_NUMBER_RANGE`.
const ORDER_NUMBER_RANGE: u32 = 10_000;

/// A processor that pretends to talk to a bank.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    delay: Duration,
}

impl SimulatedProcessor {
    /// Approve every charge after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl PaymentProcessor for SimulatedProcessor {
    #[instrument(skip(self))]
    async fn charge(&self, amount: Price) -> Result<Confirmation, PaymentError> {
        tokio::time::sleep(self.delay).await;

        let order_number = OrderNumber::new(rand::rng().random_range(0..ORDER_NUMBER_RANGE));
        info!(%order_number, "simulated payment approved");

        Ok(Confirmation::new(order_number, amount))
    }
}

/// The gateway configured for this process.
#[derive(Debug, Clone)]
pub enum PaymentGateway {
    Simulated(SimulatedProcessor),
}

impl PaymentProcessor for PaymentGateway {
    async fn charge(&self, amount: Price) -> Result<Confirmation, PaymentError> {
        match self {
            Self::Simulated(processor) => processor.charge(amount).await,
        }
    }
}

impl From<SimulatedProcessor> for PaymentGateway {
    fn from(processor: SimulatedProcessor) -> Self {
        Self::Simulated(processor)
    }
}
