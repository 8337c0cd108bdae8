//! Cart state: one line item per unit, grouped by product and finish for display.
//!
//! The cart stores a flat, ordered sequence of [`LineItem`]s. Adding three
//! units of a dripper stores three items with distinct ids. Everything the
//! drawer shows ([`GroupedEntry`] rows, the subtotal) is derived from that
//! sequence on every read, so the view can never drift from the contents.
//!
//! # Example
//!
//! ```
//! use ethos_core::{Cart, Catalog, GroupKey, LineItem};
//!
//! let catalog = Catalog::ethos();
//! let apex = catalog.featured().unwrap();
//! let black = apex.finish("Matte Black").unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add(LineItem::units(apex, black, 2));
//! assert_eq!(cart.len(), 2);
//! assert_eq!(cart.grouped_view().len(), 1);
//! assert_eq!(cart.subtotal().display(), "$290.00");
//!
//! cart.remove_group(&GroupKey::new("The Apex Dripper v2", "Matte Black"));
//! assert!(cart.is_empty());
//! ```

use core::fmt;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Finish, Product};
use crate::types::{LineItemId, Price};

/// One unit of a product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    /// Variant label, e.g. "Matte Black".
    pub finish: String,
    pub price: Price,
    pub image: String,
}

impl LineItem {
    /// Build the items for adding `quantity` units of a product in one finish.
    ///
    /// Every unit gets its own id; name, finish, price, and image are shared.
    #[must_use]
    pub fn units(product: &Product, finish: &Finish, quantity: u32) -> Vec<Self> {
        (0..quantity)
            .map(|_| Self {
                id: LineItemId::generate(),
                name: product.name.clone(),
                finish: finish.name.clone(),
                price: product.price,
                image: product.image.clone(),
            })
            .collect()
    }

    /// The group this item is displayed (and removed) under.
    #[must_use]
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.name, &self.finish)
    }

    fn in_group(&self, key: &GroupKey) -> bool {
        // Compare without allocating a key per item.
        let key = key.as_str();
        key.len() == self.name.len() + 1 + self.finish.len()
            && key.starts_with(self.name.as_str())
            && key.ends_with(self.finish.as_str())
            && key.as_bytes().get(self.name.len()) == Some(&b'-')
    }
}

/// Composite `name-finish` key identifying a group of line items.
///
/// The key is the plain concatenation `"{name}-{finish}"`. Two different
/// name/finish pairs could in principle render to the same string (a hyphen in
/// a name); such pairs are treated as one group for both display and removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Build the key for a product name and finish.
    #[must_use]
    pub fn new(name: &str, finish: &str) -> Self {
        Self(format!("{name}-{finish}"))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GroupKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for GroupKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// A display row aggregating all line items that share a name and finish.
///
/// Derived only; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedEntry {
    pub key: GroupKey,
    pub name: String,
    pub finish: String,
    /// Unit price, taken from the first item seen in the group.
    pub price: Price,
    pub image: String,
    /// Number of line items in the group.
    pub quantity: u32,
}

impl GroupedEntry {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// The visitor's cart: an ordered sequence of line items.
///
/// All operations are total: nothing here can fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append items to the end of the cart, preserving their order.
    pub fn add(&mut self, items: impl IntoIterator<Item = LineItem>) {
        self.items.extend(items);
    }

    /// Remove every item in the group identified by `key`.
    ///
    /// Returns the number of items removed; unknown keys remove nothing.
    pub fn remove_group(&mut self, key: &GroupKey) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.in_group(key));
        before - self.items.len()
    }

    /// Remove the items with the given ids, leaving everything else in order.
    ///
    /// Returns the number of items removed; ids not in the cart are ignored.
    pub fn remove_items(&mut self, ids: &[LineItemId]) -> usize {
        let ids: HashSet<LineItemId> = ids.iter().copied().collect();
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(&item.id));
        before - self.items.len()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Group items by name and finish, in order of each group's first item.
    #[must_use]
    pub fn grouped_view(&self) -> Vec<GroupedEntry> {
        let mut entries: Vec<GroupedEntry> = Vec::new();
        let mut positions: HashMap<GroupKey, usize> = HashMap::new();

        for item in &self.items {
            let key = item.group_key();
            if let Some(&position) = positions.get(&key) {
                if let Some(entry) = entries.get_mut(position) {
                    entry.quantity += 1;
                }
                continue;
            }

            positions.insert(key.clone(), entries.len());
            entries.push(GroupedEntry {
                key,
                name: item.name.clone(),
                finish: item.finish.clone(),
                price: item.price,
                image: item.image.clone(),
                quantity: 1,
            });
        }

        entries
    }

    /// Sum of every item's price, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::ProductLink;
    use crate::types::{CurrencyCode, ProductId};

    fn product(name: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            category: "Brewing".to_string(),
            price: Price::new(Decimal::from_str(price).unwrap(), CurrencyCode::USD),
            image: format!("https://img.example/{name}.jpg"),
            link: ProductLink::Unlinked,
            finishes: Vec::new(),
        }
    }

    fn finish(name: &str) -> Finish {
        Finish {
            name: name.to_string(),
            swatch: "#000".to_string(),
        }
    }

    fn usd(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap(), CurrencyCode::USD)
    }

    #[test]
    fn test_units_share_fields_but_not_ids() {
        let items = LineItem::units(&product("A", "145.00"), &finish("Matte Black"), 3);
        assert_eq!(items.len(), 3);

        let ids: HashSet<_> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(items.iter().all(|item| item.name == "A"
            && item.finish == "Matte Black"
            && item.price == usd("145.00")));
    }

    #[test]
    fn test_n_units_form_one_group() {
        let mut cart = Cart::new();
        cart.add(LineItem::units(&product("A", "145.00"), &finish("Matte Black"), 4));

        let groups = cart.grouped_view();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].quantity, 4);
        assert_eq!(groups[0].key.as_str(), "A-Matte Black");
        assert_eq!(groups[0].line_total(), usd("580.00"));
    }

    #[test]
    fn test_add_preserves_order() {
        let mut cart = Cart::new();
        let first = LineItem::units(&product("A", "1"), &finish("X"), 1);
        let second = LineItem::units(&product("B", "2"), &finish("Y"), 1);
        cart.add(first.clone());
        cart.add(second.clone());
        assert_eq!(cart.items()[0], first[0]);
        assert_eq!(cart.items()[1], second[0]);
    }

    #[test]
    fn test_grouped_view_uses_first_seen_order() {
        let mut cart = Cart::new();
        cart.add(LineItem::units(&product("B", "2"), &finish("Y"), 1));
        cart.add(LineItem::units(&product("A", "1"), &finish("X"), 1));
        cart.add(LineItem::units(&product("B", "2"), &finish("Y"), 2));

        let keys: Vec<_> = cart
            .grouped_view()
            .into_iter()
            .map(|entry| (entry.key.to_string(), entry.quantity))
            .collect();
        assert_eq!(
            keys,
            vec![("B-Y".to_string(), 3), ("A-X".to_string(), 1)]
        );
    }

    #[test]
    fn test_same_name_different_finish_are_separate_groups() {
        let apex = product("Apex", "145.00");
        let mut cart = Cart::new();
        cart.add(LineItem::units(&apex, &finish("Matte Black"), 1));
        cart.add(LineItem::units(&apex, &finish("Copper"), 1));
        assert_eq!(cart.grouped_view().len(), 2);
    }

    #[test]
    fn test_remove_group_removes_all_matching_only() {
        let apex = product("X", "10.00");
        let mut cart = Cart::new();
        cart.add(LineItem::units(&apex, &finish("Y"), 2));
        cart.add(LineItem::units(&apex, &finish("Z"), 1));
        cart.add(LineItem::units(&apex, &finish("Y"), 1));

        let removed = cart.remove_group(&GroupKey::from("X-Y"));
        assert_eq!(removed, 3);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].finish, "Z");
    }

    #[test]
    fn test_remove_items_keeps_units_added_later() {
        let apex = product("X", "10.00");
        let mut cart = Cart::new();
        cart.add(LineItem::units(&apex, &finish("Y"), 2));
        let charged: Vec<_> = cart.items().iter().map(|item| item.id).collect();
        cart.add(LineItem::units(&apex, &finish("Y"), 1));
        cart.add(LineItem::units(&apex, &finish("Z"), 1));

        let removed = cart.remove_items(&charged);
        assert_eq!(removed, 2);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), usd("20.00"));
        assert!(cart.items().iter().all(|item| !charged.contains(&item.id)));

        assert_eq!(cart.remove_items(&charged), 0);
    }

    #[test]
    fn test_remove_unknown_group_is_noop() {
        let mut cart = Cart::new();
        cart.add(LineItem::units(&product("A", "1"), &finish("X"), 2));
        let before = cart.clone();

        assert_eq!(cart.remove_group(&GroupKey::from("A-Nope")), 0);
        assert_eq!(cart.remove_group(&GroupKey::from("")), 0);
        assert_eq!(cart.remove_group(&GroupKey::from("A-")), 0);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(LineItem::units(&product("A", "1"), &finish("X"), 5));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::zero());
        assert!(cart.grouped_view().is_empty());
    }

    #[test]
    fn test_subtotal_matches_grouped_totals() {
        let mut cart = Cart::new();
        cart.add(LineItem::units(&product("A", "145.00"), &finish("Matte Black"), 2));
        cart.add(LineItem::units(&product("B", "95.00"), &finish("Steel"), 1));

        let grouped: Price = cart.grouped_view().iter().map(GroupedEntry::line_total).sum();
        assert_eq!(cart.subtotal(), grouped);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let a = product("A", "145.00");
        let b = product("B", "95.00");
        let mut cart = Cart::new();
        cart.add(LineItem::units(&a, &finish("Matte Black"), 2));
        cart.add(LineItem::units(&b, &finish("Steel"), 1));

        assert_eq!(cart.subtotal(), usd("385.00"));
        assert_eq!(cart.subtotal().display(), "$385.00");
        assert_eq!(cart.grouped_view().len(), 2);

        cart.remove_group(&GroupKey::from("A-Matte Black"));
        assert_eq!(cart.subtotal(), usd("95.00"));
        assert_eq!(cart.grouped_view().len(), 1);
    }

    #[test]
    fn test_subtotal_matches_reference_model_over_random_operations() {
        let products = [product("A", "145.00"), product("B", "95.50"), product("C", "0.01")];
        let finishes = [finish("X"), finish("Y")];
        let mut rng = StdRng::seed_from_u64(0x00E7_4051);

        let mut cart = Cart::new();
        let mut reference: Vec<(String, String, Price)> = Vec::new();

        for _ in 0..500 {
            let p = &products[rng.random_range(0..products.len())];
            let f = &finishes[rng.random_range(0..finishes.len())];
            match rng.random_range(0..10) {
                0..=5 => {
                    let quantity = rng.random_range(1..=10);
                    cart.add(LineItem::units(p, f, quantity));
                    for _ in 0..quantity {
                        reference.push((p.name.clone(), f.name.clone(), p.price));
                    }
                }
                6..=8 => {
                    cart.remove_group(&GroupKey::new(&p.name, &f.name));
                    reference.retain(|(name, fin, _)| !(name == &p.name && fin == &f.name));
                }
                _ => {
                    cart.clear();
                    reference.clear();
                }
            }

            let expected: Price = reference.iter().map(|(_, _, price)| *price).sum();
            assert_eq!(cart.subtotal(), expected);
            assert_eq!(cart.len(), reference.len());
        }
    }
}
