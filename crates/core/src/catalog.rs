//! The Ethos product catalog.
//!
//! The catalog is static: it is built once at startup and never mutated. The
//! featured product (the Apex Dripper) is the only one with selectable finishes
//! and its own detail page; the rest of the collection is browse-only.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price, ProductId};

/// Smallest quantity that can be added in one action.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity that can be added in one action.
pub const MAX_QUANTITY: u32 = 10;

/// Where a product card leads.
///
/// Resolved once per product: linked cards render as anchors to the product
/// page, unlinked cards render as plain, non-navigating cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductLink {
    /// The product has a detail page at this URL.
    Linked(String),
    /// The product has no detail page yet.
    Unlinked,
}

impl ProductLink {
    /// The target URL, if the product is linked.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Linked(url) => Some(url),
            Self::Unlinked => None,
        }
    }
}

/// A selectable product variant (colour or material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    /// Variant label, e.g. "Matte Black".
    pub name: String,
    /// CSS colour used for the swatch.
    pub swatch: String,
}

impl Finish {
    fn new(name: &str, swatch: &str) -> Self {
        Self {
            name: name.to_string(),
            swatch: swatch.to_string(),
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Breadcrumb-style category, e.g. "Brewing / Manual Pour Over".
    pub category: String,
    pub price: Price,
    pub image: String,
    pub link: ProductLink,
    /// Purchasable finishes; empty for browse-only products.
    pub finishes: Vec<Finish>,
}

impl Product {
    /// Look up one of this product's finishes by name.
    #[must_use]
    pub fn finish(&self, name: &str) -> Option<&Finish> {
        self.finishes.iter().find(|finish| finish.name == name)
    }

    /// The finish selected when the product page first loads.
    #[must_use]
    pub fn default_finish(&self) -> Option<&Finish> {
        self.finishes.first()
    }

    /// Whether this product can be added to a cart.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        !self.finishes.is_empty()
    }
}

/// Collection filter shown above the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Brewing,
    Grinders,
    Accessories,
}

impl CategoryFilter {
    /// Filters in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::Brewing, Self::Grinders, Self::Accessories];

    /// Button label, also the substring matched against product categories.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Brewing => "Brewing",
            Self::Grinders => "Grinders",
            Self::Accessories => "Accessories",
        }
    }

    /// Whether a product belongs under this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            _ => product.category.contains(self.label()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned for an unknown filter label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown collection filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for CategoryFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// The full, read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The Ethos collection.
    #[must_use]
    pub fn ethos() -> Self {
        let product = |id: i32, name: &str, category: &str, cents: i64, image: &str| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            price: Price::new(Decimal::new(cents, 2), CurrencyCode::USD),
            image: image.to_string(),
            link: ProductLink::Unlinked,
            finishes: Vec::new(),
        };

        let mut apex = product(
            1,
            "The Apex Dripper v2",
            "Brewing / Manual Pour Over",
            14_500,
            "https://images.unsplash.com/photo-1565845103399-89ff0425d093?auto=format&fit=crop&q=80&w=800",
        );
        apex.link = ProductLink::Linked("/".to_string());
        apex.finishes = vec![
            Finish::new("Matte Black", "#1a1a1a"),
            Finish::new("Brushed Steel", "#d4d4d4"),
            Finish::new("Copper", "#8c7851"),
        ];

        Self::new(vec![
            apex,
            product(
                2,
                "Precision Grinder Pro",
                "Grinders / Burr Mill",
                38_500,
                "https://plus.unsplash.com/premium_photo-1664189122777-01ad20e7fb9a?auto=format&fit=crop&q=80&w=800",
            ),
            product(
                3,
                "Gooseneck Kettle",
                "Brewing / Temperature Control",
                16_500,
                "https://plus.unsplash.com/premium_photo-1661661077686-0eef16b3d395?auto=format&fit=crop&q=80&w=800",
            ),
            product(
                4,
                "Glass Carafe Set",
                "Accessories / Serving",
                9_500,
                "https://images.unsplash.com/photo-1622088891722-c6f91b80627f?auto=format&fit=crop&q=80&w=800",
            ),
            product(
                5,
                "Airtight Canister",
                "Accessories / Storage",
                7_500,
                "https://images.unsplash.com/photo-1695510082839-6ee46279c4e8?auto=format&fit=crop&q=80&w=800",
            ),
            product(
                6,
                "Digital Scale",
                "Accessories / Measurement",
                12_500,
                "https://images.unsplash.com/photo-1753091122032-ddfb454849cc?auto=format&fit=crop&q=80&w=800",
            ),
        ])
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// The product shown on the home page: the first purchasable one.
    #[must_use]
    pub fn featured(&self) -> Option<&Product> {
        self.products.iter().find(|product| product.is_purchasable())
    }

    /// Products matching a collection filter, in catalog order.
    pub fn filter(&self, filter: CategoryFilter) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |product| filter.matches(product))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::ethos()
    }
}

/// Clamp a requested quantity into the range a single add accepts.
#[must_use]
pub fn clamp_quantity(requested: u32) -> u32 {
    requested.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(catalog: &Catalog, filter: CategoryFilter) -> Vec<&str> {
        catalog
            .filter(filter)
            .map(|product| product.name.as_str())
            .collect()
    }

    #[test]
    fn test_all_filter_returns_everything() {
        let catalog = Catalog::ethos();
        assert_eq!(names(&catalog, CategoryFilter::All).len(), 6);
    }

    #[test]
    fn test_filter_matches_category_substring() {
        let catalog = Catalog::ethos();
        assert_eq!(
            names(&catalog, CategoryFilter::Brewing),
            vec!["The Apex Dripper v2", "Gooseneck Kettle"]
        );
        assert_eq!(
            names(&catalog, CategoryFilter::Grinders),
            vec!["Precision Grinder Pro"]
        );
        assert_eq!(names(&catalog, CategoryFilter::Accessories).len(), 3);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!(
            "brewing".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Brewing
        );
        assert!("Kettles".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_only_featured_product_is_linked() {
        let catalog = Catalog::ethos();
        let linked: Vec<_> = catalog
            .products()
            .iter()
            .filter_map(|product| product.link.url())
            .collect();
        assert_eq!(linked, vec!["/"]);
    }

    #[test]
    fn test_featured_product_finishes() {
        let catalog = Catalog::ethos();
        let apex = catalog.featured().unwrap();
        assert_eq!(apex.id, ProductId::new(1));
        assert_eq!(apex.default_finish().unwrap().name, "Matte Black");
        assert!(apex.finish("Copper").is_some());
        assert!(apex.finish("Gold").is_none());
    }

    #[test]
    fn test_browse_only_products_are_not_purchasable() {
        let catalog = Catalog::ethos();
        let grinder = catalog.get(ProductId::new(2)).unwrap();
        assert!(!grinder.is_purchasable());
        assert!(catalog.get(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(4), 4);
        assert_eq!(clamp_quantity(25), 10);
    }
}
