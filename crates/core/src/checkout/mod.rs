//! Checkout: payment-field formatting, form validation, and the submission flow.
//!
//! - [`format`] - as-you-type formatters for card number, expiry, and CVC
//! - [`validate`] - the checkout form and its field-keyed error mapping
//! - [`payment`] - the [`PaymentProcessor`] capability and its confirmation
//! - [`flow`] - the `Idle -> Processing -> Succeeded` state machine

pub mod flow;
pub mod format;
pub mod payment;
pub mod validate;

pub use flow::{CheckoutFlow, CheckoutState, Completion, FlowError, PendingCharge, SubmissionTicket};
pub use format::{format_card_number, format_cvc, format_expiry};
pub use payment::{Confirmation, OrderNumber, PaymentError, PaymentProcessor};
pub use validate::{CheckoutField, CheckoutForm, FieldErrors, validate};
