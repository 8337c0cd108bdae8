//! Session-related types.
//!
//! The session itself stores only the visitor's id. Cart and checkout state
//! live in [`crate::services::visitors::VisitorStore`], keyed by that id.

/// Session keys.
pub mod keys {
    /// Key for the visitor id (a UUID) that owns the cart and checkout state.
    pub const VISITOR_ID: &str = "visitor_id";
}
