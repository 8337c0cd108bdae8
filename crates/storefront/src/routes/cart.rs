//! Cart route handlers.
//!
//! Cart operations use HTMX for drawer updates without full page reloads.
//! Every handler also works as a plain form post, answering with a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use ethos_core::catalog::clamp_quantity;
use ethos_core::{Cart, GroupKey, GroupedEntry, LineItem, ProductId};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::Layout;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, HxRequest, Visitor};
use crate::models::VisitorState;
use crate::state::AppState;

/// One grouped row in the drawer.
#[derive(Clone)]
pub struct CartItemView {
    /// Group key, posted back to remove the row.
    pub key: String,
    pub name: String,
    pub finish: String,
    pub image: String,
    pub quantity: u32,
    /// "2 × $145.00" for several units, "$145.00" for one.
    pub quantity_label: String,
    pub line_total: String,
}

impl From<&GroupedEntry> for CartItemView {
    fn from(entry: &GroupedEntry) -> Self {
        let unit = entry.price.display();
        let quantity_label = if entry.quantity > 1 {
            format!("{} × {unit}", entry.quantity)
        } else {
            unit
        };

        Self {
            key: entry.key.to_string(),
            name: entry.name.clone(),
            finish: entry.finish.clone(),
            image: entry.image.clone(),
            quantity: entry.quantity,
            quantity_label,
            line_total: entry.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Units in the cart.
    pub item_count: usize,
}

impl CartView {
    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.grouped_view().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.len(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub finish: String,
    pub quantity: Option<u32>,
    /// Page to come back to when not using HTMX.
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub key: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Only same-site absolute paths are followed after a plain form post.
fn safe_return_path(candidate: Option<&str>) -> &str {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// `path` with `cart=open` added to its query string.
fn with_drawer_open(path: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}cart=open")
}

/// `HX-Trigger` payload telling the page the cart changed.
fn cart_updated_trigger(count: usize) -> String {
    json!({ "cart-updated": { "count": count } }).to_string()
}

/// Display the cart: the drawer fragment for HTMX, a full page otherwise.
#[instrument(skip(visitor, nonce))]
pub async fn show(
    visitor: Visitor,
    HxRequest(is_htmx): HxRequest,
    CspNonce(nonce): CspNonce,
) -> Response {
    let state = visitor.lock().await;
    let cart = CartView::from(&state.cart);

    if is_htmx {
        return CartDrawerTemplate { cart }.into_response();
    }

    CartShowTemplate {
        layout: Layout::new(nonce, "", &state.cart, false),
        cart,
    }
    .into_response()
}

/// Add `quantity` units of a product in one finish.
///
/// Quantities outside 1..=10 are clamped. HTMX callers get the new badge and
/// an `open-cart` trigger carrying the drawer delay; plain posts are sent back
/// where they came from with the drawer open.
#[instrument(skip(state, visitor))]
pub async fn add(
    State(state): State<AppState>,
    visitor: Visitor,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(ProductId::new(form.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if !product.is_purchasable() {
        return Err(AppError::BadRequest(format!(
            "{} is not available to order",
            product.name
        )));
    }

    let finish = product.finish(&form.finish).ok_or_else(|| {
        AppError::BadRequest(format!("{} has no finish {:?}", product.name, form.finish))
    })?;

    let quantity = clamp_quantity(form.quantity.unwrap_or(1));
    let count = {
        let mut visitor = visitor.lock().await;
        visitor.on_add_to_cart(LineItem::units(product, finish, quantity));
        visitor.cart.len()
    };

    tracing::info!(product = %product.name, finish = %finish.name, quantity, "added to cart");
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product", product.name.as_str()),
            ("finish", finish.name.as_str()),
        ]),
    );

    if is_htmx {
        let trigger = json!({
            "cart-updated": { "count": count },
            "open-cart": { "delayMs": state.config().cart_open_delay_ms() },
        })
        .to_string();

        return Ok((
            AppendHeaders([("HX-Trigger", trigger)]),
            CartCountTemplate { count },
        )
            .into_response());
    }

    let back = safe_return_path(form.return_to.as_deref());
    Ok(Redirect::to(&with_drawer_open(back)).into_response())
}

/// Units already being paid for stay put until the charge settles.
fn ensure_removable(state: &VisitorState) -> Result<()> {
    if state.checkout.is_processing() {
        return Err(AppError::Conflict(
            "cart is locked while payment is processing".to_string(),
        ));
    }
    Ok(())
}

/// Remove every unit of one variant group.
#[instrument(skip(visitor))]
pub async fn remove(
    visitor: Visitor,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut state = visitor.lock().await;
    ensure_removable(&state)?;
    let removed = state.on_remove_group(&GroupKey::from(form.key));
    tracing::debug!(removed, "removed cart group");

    Ok(drawer_response(&state.cart, is_htmx))
}

/// Empty the cart.
#[instrument(skip(visitor))]
pub async fn clear(visitor: Visitor, HxRequest(is_htmx): HxRequest) -> Result<Response> {
    let mut state = visitor.lock().await;
    ensure_removable(&state)?;
    state.on_clear_cart();

    Ok(drawer_response(&state.cart, is_htmx))
}

/// The refreshed drawer for HTMX, or back to the cart page.
fn drawer_response(cart: &Cart, is_htmx: bool) -> Response {
    if !is_htmx {
        return Redirect::to("/cart").into_response();
    }

    (
        AppendHeaders([("HX-Trigger", cart_updated_trigger(cart.len()))]),
        CartDrawerTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(visitor))]
pub async fn count(visitor: Visitor) -> impl IntoResponse {
    CartCountTemplate {
        count: visitor.lock().await.cart.len(),
    }
}
