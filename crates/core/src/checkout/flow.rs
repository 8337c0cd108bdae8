//! The checkout state machine.
//!
//! ```text
//!            submit (invalid)
//!           +--------------+
//!           v              |
//!         Idle ------------+
//!           |  submit (valid)
//!           v
//!       Processing --complete(Err)--> Idle (with failure message)
//!           |
//!           | complete(Ok)
//!           v
//!       Succeeded  (terminal)
//! ```
//!
//! Submission is split in two so callers never hold the flow while a charge is
//! in flight: [`CheckoutFlow::begin_submit`] hands out a [`PendingCharge`]
//! carrying a ticket, and [`CheckoutFlow::complete`] takes the ticket back.
//! [`CheckoutFlow::close`] abandons the flow at any point; a completion for a
//! ticket issued before the close is reported as [`Completion::Stale`] and
//! changes nothing.

use tracing::debug;

use super::payment::{Confirmation, PaymentError, PaymentProcessor};
use super::validate::{CheckoutForm, FieldErrors, validate};
use crate::cart::Cart;
use crate::types::{LineItemId, Price};

/// Identifies one submission of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(u64);

/// A charge the caller must now perform and report back.
///
/// `items` are exactly the units `amount` pays for; on success those, and
/// only those, leave the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCharge {
    pub ticket: SubmissionTicket,
    pub amount: Price,
    pub items: Vec<LineItemId>,
}

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Accepting input. Errors from the last attempt, if any, live on the flow.
    #[default]
    Idle,
    /// A charge is in flight; further submits are refused.
    Processing { ticket: SubmissionTicket },
    /// Payment confirmed. Terminal.
    Succeeded { confirmation: Confirmation },
}

/// Why a submit was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// One or more fields failed validation. The flow stays idle.
    #[error("{} checkout field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    /// A charge is already in flight.
    #[error("a payment is already being processed")]
    AlreadyProcessing,

    /// This flow already completed; close it to start over.
    #[error("checkout has already completed")]
    AlreadyCompleted,
}

/// Outcome of reporting a charge result back to the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The charge succeeded; the caller should remove the charged items.
    Succeeded(Confirmation),
    /// The charge failed; the flow is idle again with a failure message.
    Failed(PaymentError),
    /// The ticket no longer matches (the flow was closed or restarted).
    Stale,
}

/// One visitor's checkout, from opening the form to confirmation.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    form: CheckoutForm,
    errors: FieldErrors,
    failure: Option<String>,
    state: CheckoutState,
    next_ticket: u64,
}

impl CheckoutFlow {
    /// A fresh, idle flow with an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The form as last submitted (normalised), or empty.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Field errors from the last submit.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Message from the last failed charge.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Whether a charge is in flight (the pay button is locked).
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.state, CheckoutState::Processing { .. })
    }

    /// The confirmation, once the flow has succeeded.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&Confirmation> {
        match &self.state {
            CheckoutState::Succeeded { confirmation } => Some(confirmation),
            _ => None,
        }
    }

    /// Validate the form and, if it passes, move to `Processing` to charge the
    /// cart's subtotal.
    ///
    /// The form is normalised through the field formatters first and kept on
    /// the flow either way, so it can be redisplayed.
    ///
    /// # Errors
    ///
    /// - [`FlowError::Invalid`] if any field fails; the flow stays idle
    /// - [`FlowError::AlreadyProcessing`] if a charge is in flight
    /// - [`FlowError::AlreadyCompleted`] if the flow has succeeded
    pub fn begin_submit(
        &mut self,
        form: CheckoutForm,
        cart: &Cart,
    ) -> Result<PendingCharge, FlowError> {
        match self.state {
            CheckoutState::Idle => {}
            CheckoutState::Processing { .. } => return Err(FlowError::AlreadyProcessing),
            CheckoutState::Succeeded { .. } => return Err(FlowError::AlreadyCompleted),
        }

        self.form = form.normalized();
        self.errors = validate(&self.form);
        self.failure = None;

        if !self.errors.is_empty() {
            debug!(fields = self.errors.len(), "checkout form rejected");
            return Err(FlowError::Invalid(self.errors.clone()));
        }

        let ticket = SubmissionTicket(self.next_ticket);
        self.next_ticket += 1;
        self.state = CheckoutState::Processing { ticket };

        Ok(PendingCharge {
            ticket,
            amount: cart.subtotal(),
            items: cart.items().iter().map(|item| item.id).collect(),
        })
    }

    /// Report the result of the charge for `ticket`.
    ///
    /// On success the form is reset and the flow becomes terminal. On failure
    /// the flow returns to idle with the processor's message. A ticket that is
    /// not the one currently processing is ignored.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<Confirmation, PaymentError>,
    ) -> Completion {
        match self.state {
            CheckoutState::Processing { ticket: current } if current == ticket => {}
            _ => {
                debug!(?ticket, "ignoring completion for abandoned submission");
                return Completion::Stale;
            }
        }

        match result {
            Ok(confirmation) => {
                self.form = CheckoutForm::default();
                self.errors = FieldErrors::default();
                self.state = CheckoutState::Succeeded {
                    confirmation: confirmation.clone(),
                };
                Completion::Succeeded(confirmation)
            }
            Err(error) => {
                self.failure = Some(error.to_string());
                self.state = CheckoutState::Idle;
                Completion::Failed(error)
            }
        }
    }

    /// Abandon the flow: back to a fresh idle form.
    ///
    /// Any in-flight submission becomes stale.
    pub fn close(&mut self) {
        self.form = CheckoutForm::default();
        self.errors = FieldErrors::default();
        self.failure = None;
        self.state = CheckoutState::Idle;
    }

    /// Run a whole submission against `processor` while holding the flow.
    ///
    /// Convenient when the flow is not shared. Callers that must let other
    /// requests reach the flow during the charge should use
    /// [`begin_submit`](Self::begin_submit) and [`complete`](Self::complete).
    ///
    /// # Errors
    ///
    /// Same as [`begin_submit`](Self::begin_submit).
    pub async fn submit<P: PaymentProcessor>(
        &mut self,
        processor: &P,
        form: CheckoutForm,
        cart: &Cart,
    ) -> Result<Completion, FlowError> {
        let pending = self.begin_submit(form, cart)?;
        let result = processor.charge(pending.amount).await;
        Ok(self.complete(pending.ticket, result))
    }
}
