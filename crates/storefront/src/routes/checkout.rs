//! Checkout route handlers.
//!
//! The form posts normally (no HTMX): the response is either the form again
//! with inline errors, or the confirmation. The charge runs on its own task
//! so it completes, and the charged items leave the cart, even if the
//! shopper's connection drops while waiting.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use ethos_core::Country;
use ethos_core::checkout::{
    CheckoutField, CheckoutForm, Completion, Confirmation, FlowError, PaymentProcessor,
};
use tracing::instrument;

use super::Layout;
use super::cart::CartView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Visitor};
use crate::models::VisitorState;
use crate::state::AppState;

/// A country in the select box.
#[derive(Clone)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// Inline message per field, `None` when the field is fine.
#[derive(Clone, Default)]
pub struct FieldErrorsView {
    pub email: Option<&'static str>,
    pub card_number: Option<&'static str>,
    pub expiry: Option<&'static str>,
    pub cvc: Option<&'static str>,
    pub name: Option<&'static str>,
}

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub form: CheckoutForm,
    pub errors: FieldErrorsView,
    /// Why the last charge failed, if it did.
    pub failure: Option<String>,
    /// A charge is in flight; the pay button renders locked.
    pub processing: bool,
    /// "Pay $435.00"
    pub pay_label: String,
    pub summary: CartView,
    pub countries: Vec<CountryOption>,
}

impl CheckoutTemplate {
    fn new(nonce: String, visitor: &VisitorState) -> Self {
        let flow = &visitor.checkout;
        let errors = flow.errors();
        let form = flow.form().clone();

        Self {
            layout: Layout::new(nonce, "", &visitor.cart, false),
            errors: FieldErrorsView {
                email: errors.get(CheckoutField::Email),
                card_number: errors.get(CheckoutField::CardNumber),
                expiry: errors.get(CheckoutField::Expiry),
                cvc: errors.get(CheckoutField::Cvc),
                name: errors.get(CheckoutField::Name),
            },
            failure: flow.failure().map(str::to_string),
            processing: flow.is_processing(),
            pay_label: format!("Pay {}", visitor.cart.subtotal().display()),
            summary: CartView::from(&visitor.cart),
            countries: Country::ALL
                .into_iter()
                .map(|country| CountryOption {
                    code: country.code(),
                    name: country.name(),
                    selected: country == form.country,
                })
                .collect(),
            form,
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub layout: Layout,
    pub order_number: String,
    pub amount: String,
    pub estimated_delivery: String,
}

impl SuccessTemplate {
    fn new(layout: Layout, confirmation: &Confirmation) -> Self {
        Self {
            layout,
            order_number: confirmation.order_number.to_string(),
            amount: confirmation.amount.display(),
            estimated_delivery: confirmation.estimated_delivery.clone(),
        }
    }
}

/// Display the checkout form.
///
/// A finished checkout keeps showing its confirmation until the shopper moves
/// on; once the cart has items again a fresh checkout starts.
#[instrument(skip(visitor, nonce))]
pub async fn show(visitor: Visitor, CspNonce(nonce): CspNonce) -> Response {
    let mut visitor = visitor.lock().await;

    if let Some(confirmation) = visitor.checkout.confirmation().cloned() {
        if visitor.cart.is_empty() {
            let layout = Layout::new(nonce, "", &visitor.cart, false);
            return SuccessTemplate::new(layout, &confirmation).into_response();
        }
        visitor.checkout.close();
    }

    if visitor.cart.is_empty() {
        return Redirect::to("/").into_response();
    }

    CheckoutTemplate::new(nonce, &visitor).into_response()
}

/// Validate the form and charge the cart subtotal.
///
/// - invalid form: 422 with inline errors
/// - declined or failed charge: 402 with the processor's message
/// - success: the confirmation, with the cart emptied
/// - checkout closed while the charge ran: back to the shop
#[instrument(skip(state, visitor, nonce, form), fields(visitor_id = %visitor.id()))]
pub async fn submit(
    State(state): State<AppState>,
    visitor: Visitor,
    CspNonce(nonce): CspNonce,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let pending = {
        let mut visitor = visitor.lock().await;

        if visitor.checkout.confirmation().is_some() {
            visitor.checkout.close();
        }
        if visitor.cart.is_empty() {
            return Ok(Redirect::to("/").into_response());
        }

        let current = &mut *visitor;
        match current.checkout.begin_submit(form, &current.cart) {
            Ok(pending) => pending,
            Err(FlowError::Invalid(errors)) => {
                tracing::debug!(fields = errors.len(), "checkout form invalid");
                let page = CheckoutTemplate::new(nonce, &visitor);
                return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
            }
            Err(e @ (FlowError::AlreadyProcessing | FlowError::AlreadyCompleted)) => {
                return Err(AppError::Conflict(e.to_string()));
            }
        }
    };

    tracing::info!(amount = %pending.amount, "charging");

    let handle = visitor.handle();
    let payments = state.payments().clone();
    let completion = tokio::spawn(async move {
        let result = payments.charge(pending.amount).await;
        let mut visitor = handle.lock().await;
        let completion = visitor.checkout.complete(pending.ticket, result);
        if matches!(completion, Completion::Succeeded(_)) {
            visitor.on_checkout_success(&pending.items);
        }
        completion
    })
    .await
    .map_err(|e| AppError::Internal(format!("payment task failed: {e}")))?;

    let visitor = visitor.lock().await;
    match completion {
        Completion::Succeeded(confirmation) => {
            tracing::info!(order_number = %confirmation.order_number, "order confirmed");
            add_breadcrumb(
                "checkout",
                "Order confirmed",
                Some(&[(
                    "order_number",
                    confirmation.order_number.to_string().as_str(),
                )]),
            );
            let layout = Layout::new(nonce, "", &visitor.cart, false);
            Ok(SuccessTemplate::new(layout, &confirmation).into_response())
        }
        Completion::Failed(error) => {
            tracing::warn!(%error, "payment failed");
            let page = CheckoutTemplate::new(nonce, &visitor);
            Ok((StatusCode::PAYMENT_REQUIRED, page).into_response())
        }
        Completion::Stale => {
            tracing::info!("checkout closed while payment was processing");
            Ok(Redirect::to("/").into_response())
        }
    }
}

/// Abandon the checkout and go back to the shop.
#[instrument(skip(visitor))]
pub async fn close(visitor: Visitor) -> Redirect {
    visitor.lock().await.checkout.close();
    Redirect::to("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ethos_core::checkout::OrderNumber;
    use ethos_core::{Catalog, LineItem, Price};

    use super::*;

    fn visitor_with_cart() -> VisitorState {
        let catalog = Catalog::ethos();
        let apex = catalog.featured().unwrap();
        let mut visitor = VisitorState::default();
        visitor.on_add_to_cart(LineItem::units(apex, apex.finish("Copper").unwrap(), 3));
        visitor
    }

    #[test]
    fn test_form_template_pay_label_and_defaults() {
        let page = CheckoutTemplate::new(String::new(), &visitor_with_cart());

        assert_eq!(page.pay_label, "Pay $435.00");
        assert!(!page.processing);
        assert!(page.failure.is_none());
        assert!(page.errors.email.is_none());
        let selected: Vec<_> = page
            .countries
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.code)
            .collect();
        assert_eq!(selected, vec!["US"]);
    }

    #[test]
    fn test_form_template_shows_field_errors() {
        let mut visitor = visitor_with_cart();
        let form = CheckoutForm {
            email: "bad".to_string(),
            name: "Ada".to_string(),
            ..CheckoutForm::default()
        };
        assert!(visitor.checkout.begin_submit(form, &visitor.cart).is_err());

        let page = CheckoutTemplate::new(String::new(), &visitor);
        assert_eq!(page.errors.email, Some("Enter a valid email"));
        assert_eq!(page.errors.card_number, Some("Card number is incomplete"));
        assert!(page.errors.name.is_none());
        assert_eq!(page.form.email, "bad");
    }

    #[test]
    fn test_success_template_fields() {
        let confirmation = Confirmation::new(OrderNumber::new(4821), Price::usd_cents(43_500));
        let layout = Layout::new(String::new(), "", &ethos_core::Cart::new(), false);
        let page = SuccessTemplate::new(layout, &confirmation);

        assert_eq!(page.order_number, "#ETH-4821");
        assert_eq!(page.amount, "$435.00");
        assert_eq!(page.estimated_delivery, "3-5 business days");
    }
}
