//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product detail (Apex Dripper v2)
//! GET  /collection             - Collection grid (?filter=All|Brewing|Grinders|Accessories)
//! GET  /process                - How we build
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments, full-page fallbacks)
//! GET  /cart                   - Cart drawer (fragment for HTMX, page otherwise)
//! POST /cart/add               - Add N units (triggers cart-updated, open-cart)
//! POST /cart/remove            - Remove a variant group
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form ("Pay $total")
//! POST /checkout               - Validate and pay
//! POST /checkout/close         - Abandon checkout
//! ```
//!
//! Any page accepts `?cart=open` to render with the cart drawer already open,
//! which is how the drawer works without JavaScript.

pub mod cart;
pub mod checkout;
pub mod collection;
pub mod home;
pub mod process;

use axum::{
    Router,
    routing::{get, post},
};
use ethos_core::Cart;
use serde::Deserialize;

use crate::state::AppState;
use cart::CartView;

/// Query parameters every page understands.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// `open` renders the cart drawer open.
    pub cart: Option<String>,
}

impl PageQuery {
    /// Whether the drawer should render open.
    #[must_use]
    pub fn drawer_open(&self) -> bool {
        self.cart.as_deref() == Some("open")
    }
}

/// Data the base layout needs on every page.
#[derive(Clone)]
pub struct Layout {
    pub nonce: String,
    /// Nav section to highlight: "home", "collection", "process", or "".
    pub active: &'static str,
    /// Units in the cart, shown in the nav badge.
    pub cart_count: usize,
    /// The drawer contents when it renders open.
    pub drawer: Option<CartView>,
}

impl Layout {
    /// Layout for a page, with the drawer open if asked.
    #[must_use]
    pub fn new(nonce: String, active: &'static str, cart: &Cart, drawer_open: bool) -> Self {
        Self {
            nonce,
            active,
            cart_count: cart.len(),
            drawer: drawer_open.then(|| CartView::from(cart)),
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/close", post(checkout::close))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::show))
        .route("/collection", get(collection::index))
        .route("/process", get(process::show))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
