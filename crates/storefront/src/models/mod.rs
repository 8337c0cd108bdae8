//! Storefront models.
//!
//! - `session` - Keys for values stored in the visitor's session
//! - `visitor` - Per-visitor cart and checkout state

pub mod session;
pub mod visitor;

pub use session::keys as session_keys;
pub use visitor::VisitorState;
