//! Per-visitor state: the cart and the checkout flow.

use ethos_core::checkout::CheckoutFlow;
use ethos_core::{Cart, GroupKey, LineItem, LineItemId};

/// Everything the storefront remembers about one visitor.
#[derive(Debug, Clone, Default)]
pub struct VisitorState {
    pub cart: Cart,
    pub checkout: CheckoutFlow,
}

impl VisitorState {
    /// Append freshly built units to the cart.
    pub fn on_add_to_cart(&mut self, items: Vec<LineItem>) {
        self.cart.add(items);
    }

    /// Remove every unit in a group. Returns how many were removed.
    pub fn on_remove_group(&mut self, key: &GroupKey) -> usize {
        self.cart.remove_group(key)
    }

    /// Empty the cart.
    pub fn on_clear_cart(&mut self) {
        self.cart.clear();
    }

    /// The order went through: the charged units are spent.
    ///
    /// Only `charged` leaves the cart; anything else in it was not paid for.
    pub fn on_checkout_success(&mut self, charged: &[LineItemId]) {
        let removed = self.cart.remove_items(charged);
        tracing::debug!(removed, remaining = self.cart.len(), "charged items removed");
    }
}
