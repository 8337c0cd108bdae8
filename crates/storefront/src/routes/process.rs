//! "How We Build" page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use tracing::instrument;

use super::{Layout, PageQuery};
use crate::filters;
use crate::middleware::{CspNonce, Visitor};

/// One numbered section of the page.
pub struct ProcessStep {
    pub number: &'static str,
    pub title: &'static str,
    pub image: &'static str,
    pub paragraphs: [&'static str; 2],
    /// Image on the right instead of the left.
    pub reverse: bool,
}

static STEPS: [ProcessStep; 4] = [
    ProcessStep {
        number: "01 · Design Philosophy",
        title: "Form Follows Function",
        image: "https://images.unsplash.com/photo-1498804103079-a6351b050096?auto=format&fit=crop&q=80&w=1200",
        paragraphs: [
            "We design from the inside out. Every curve, every angle, every material choice \
             serves the extraction. Aesthetics emerge naturally from engineering decisions \
             made in pursuit of better coffee.",
            "Our studio collaborates with baristas, roasters, and material scientists to \
             understand the physics of brewing at a fundamental level. Only then do we begin \
             sketching.",
        ],
        reverse: false,
    },
    ProcessStep {
        number: "02 · Materials & Craft",
        title: "Honest Materials",
        image: "https://images.unsplash.com/photo-1504917595217-d4dc5ebe6122?auto=format&fit=crop&q=80&w=1200",
        paragraphs: [
            "We source borosilicate glass from Germany, aerospace-grade aluminum from Japan, \
             and stainless steel from Sweden. Each material is chosen for its thermal \
             properties, durability, and ability to age gracefully.",
            "Our manufacturing partners are small workshops that have been perfecting their \
             craft for generations. They share our obsession with precision and our refusal \
             to compromise.",
        ],
        reverse: true,
    },
    ProcessStep {
        number: "03 · Precision Engineering",
        title: "Measured in Microns",
        image: "https://images.unsplash.com/photo-1537462715879-360eeb61a0ad?auto=format&fit=crop&q=80&w=1200",
        paragraphs: [
            "Temperature stability within 0.5°C. Flow rates calculated to three decimal \
             places. Tolerances measured in microns. These aren't marketing claims; they're \
             engineering requirements.",
            "We prototype extensively, testing each iteration with professional baristas and \
             measuring extraction consistency across hundreds of brews. A product only enters \
             production when we can't improve it further.",
        ],
        reverse: false,
    },
    ProcessStep {
        number: "04 · Quality Control",
        title: "Inspected by Hand",
        image: "https://images.unsplash.com/photo-1581091226825-a6a2a5aee158?auto=format&fit=crop&q=80&w=1200",
        paragraphs: [
            "Every piece that leaves our facility is individually inspected. We check for \
             surface imperfections invisible to the naked eye, test thermal performance \
             against specification, and verify that each product meets our exacting \
             standards.",
            "It's slower. It's more expensive. But it's the only way to ensure that what \
             arrives at your door performs exactly as intended, every single time.",
        ],
        reverse: true,
    },
];

/// Process page template.
#[derive(Template, WebTemplate)]
#[template(path = "process.html")]
pub struct ProcessTemplate {
    pub layout: Layout,
    pub steps: &'static [ProcessStep],
}

/// Display the process page.
#[instrument(skip(visitor, nonce))]
pub async fn show(
    visitor: Visitor,
    CspNonce(nonce): CspNonce,
    Query(query): Query<PageQuery>,
) -> ProcessTemplate {
    let layout = {
        let visitor = visitor.lock().await;
        Layout::new(nonce, "process", &visitor.cart, query.drawer_open())
    };

    ProcessTemplate {
        layout,
        steps: &STEPS,
    }
}
