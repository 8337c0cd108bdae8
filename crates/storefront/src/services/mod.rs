//! Services behind the route handlers.
//!
//! - `visitors` - In-memory store of per-visitor cart and checkout state
//! - `payment` - Payment gateways implementing `PaymentProcessor`

pub mod payment;
pub mod visitors;

pub use payment::{PaymentGateway, SimulatedProcessor};
pub use visitors::{VisitorHandle, VisitorStore};
