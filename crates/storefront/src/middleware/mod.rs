//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for inline scripts)
//! 5. Security headers (CSP using the nonce, isolation headers)
//! 6. Session layer (tower-sessions with in-memory store)
//!
//! Extractors:
//! - [`Visitor`] - the visitor's cart and checkout state
//! - [`HxRequest`] - whether the request came from HTMX
//! - [`CspNonce`] - the per-request nonce

pub mod csp;
pub mod htmx;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod visitor;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use htmx::HxRequest;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use visitor::Visitor;
