//! Collection grid with category filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use ethos_core::{CategoryFilter, Product};
use serde::Deserialize;
use tracing::instrument;

use super::Layout;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Visitor};
use crate::state::AppState;

/// Collection page query.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub filter: Option<String>,
    pub cart: Option<String>,
}

/// A product card in the grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
    /// Detail page; `None` renders a non-navigating card.
    pub href: Option<String>,
    /// Position in the grid, used for the staggered entrance.
    pub position: usize,
}

impl ProductCardView {
    fn new(product: &Product, position: usize) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            href: product.link.url().map(str::to_string),
            position,
        }
    }
}

/// A filter button.
#[derive(Clone)]
pub struct FilterView {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Collection page template.
#[derive(Template, WebTemplate)]
#[template(path = "collection.html")]
pub struct CollectionTemplate {
    pub layout: Layout,
    pub filter_buttons: Vec<FilterView>,
    pub products: Vec<ProductCardView>,
}

fn filter_views(active: CategoryFilter) -> Vec<FilterView> {
    CategoryFilter::ALL
        .into_iter()
        .map(|filter| FilterView {
            label: filter.label(),
            href: match filter {
                CategoryFilter::All => "/collection".to_string(),
                _ => format!("/collection?filter={}", filter.label()),
            },
            active: filter == active,
        })
        .collect()
}

/// Display the collection, filtered by category.
#[instrument(skip(state, visitor, nonce))]
pub async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    CspNonce(nonce): CspNonce,
    Query(query): Query<CollectionQuery>,
) -> Result<CollectionTemplate> {
    let filter = match query.filter.as_deref() {
        None | Some("") => CategoryFilter::All,
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
    };

    let products = state
        .catalog()
        .filter(filter)
        .enumerate()
        .map(|(position, product)| ProductCardView::new(product, position))
        .collect();

    let drawer_open = query.cart.as_deref() == Some("open");
    let layout = {
        let visitor = visitor.lock().await;
        Layout::new(nonce, "collection", &visitor.cart, drawer_open)
    };

    Ok(CollectionTemplate {
        layout,
        filter_buttons: filter_views(filter),
        products,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ethos_core::Catalog;

    use super::*;

    #[test]
    fn test_only_apex_card_links() {
        let catalog = Catalog::ethos();
        let cards: Vec<_> = catalog
            .filter(CategoryFilter::All)
            .enumerate()
            .map(|(i, p)| ProductCardView::new(p, i))
            .collect();

        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].href.as_deref(), Some("/"));
        assert!(cards.iter().skip(1).all(|card| card.href.is_none()));
        assert_eq!(cards[1].price, "$385.00");
    }

    #[test]
    fn test_filter_views_mark_active() {
        let views = filter_views(CategoryFilter::Grinders);
        let active: Vec<_> = views.iter().filter(|v| v.active).map(|v| v.label).collect();
        assert_eq!(active, vec!["Grinders"]);
        assert_eq!(views[0].href, "/collection");
        assert_eq!(views[2].href, "/collection?filter=Grinders");
    }
}
