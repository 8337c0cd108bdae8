//! Home page: the featured product's detail view.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use ethos_core::Product;
use ethos_core::catalog::{MAX_QUANTITY, MIN_QUANTITY};
use tracing::instrument;

use super::{Layout, PageQuery};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Visitor};
use crate::state::AppState;

/// Gallery photography for the featured product.
const GALLERY: [(&str, &str); 3] = [
    (
        "https://images.unsplash.com/photo-1600093463592-8e36ae95ef56?auto=format&fit=crop&q=80&w=1200",
        "The Apex Dripper, side profile",
    ),
    (
        "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?auto=format&fit=crop&q=80&w=1200",
        "Pour over in progress",
    ),
    (
        "https://images.unsplash.com/photo-1517088455889-bfa75135412c?auto=format&fit=crop&q=80&w=1200",
        "The Apex Dripper on a walnut stand",
    ),
];

/// A finish swatch on the product page.
#[derive(Clone)]
pub struct FinishView {
    pub name: String,
    pub swatch: String,
    /// Selected when the page loads.
    pub selected: bool,
}

/// An image in the product gallery.
#[derive(Clone)]
pub struct GalleryImage {
    pub src: &'static str,
    pub alt: &'static str,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: String,
    pub finishes: Vec<FinishView>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let default_finish = product.default_finish().map(|finish| finish.name.as_str());
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            finishes: product
                .finishes
                .iter()
                .map(|finish| FinishView {
                    name: finish.name.clone(),
                    swatch: finish.swatch.clone(),
                    selected: Some(finish.name.as_str()) == default_finish,
                })
                .collect(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub gallery: Vec<GalleryImage>,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

/// Display the featured product.
#[instrument(skip(state, visitor, nonce))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    CspNonce(nonce): CspNonce,
    Query(query): Query<PageQuery>,
) -> Result<HomeTemplate> {
    let product = state
        .catalog()
        .featured()
        .ok_or_else(|| AppError::Internal("catalog has no purchasable product".to_string()))?;

    let layout = {
        let visitor = visitor.lock().await;
        Layout::new(nonce, "home", &visitor.cart, query.drawer_open())
    };

    Ok(HomeTemplate {
        layout,
        product: ProductView::from(product),
        gallery: GALLERY
            .iter()
            .map(|&(src, alt)| GalleryImage { src, alt })
            .collect(),
        min_quantity: MIN_QUANTITY,
        max_quantity: MAX_QUANTITY,
    })
}
