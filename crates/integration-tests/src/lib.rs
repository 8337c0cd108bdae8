//! Integration tests for the Ethos storefront.
//!
//! Each test starts the real application on an ephemeral port and talks to
//! it over HTTP with a cookie-keeping client, so every test is its own
//! visitor.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ethos-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `pages` - Page rendering, filters, headers, static assets
//! - `cart` - Adding, removing, clearing, and the drawer fallbacks
//! - `checkout` - Validation, payment, confirmation, and closing

use std::net::SocketAddr;
use std::time::Duration;

use ethos_storefront::{app, config::StorefrontConfig, state::AppState};
use reqwest::Client;
use tokio::task::JoinHandle;

/// A storefront running on a random local port.
pub struct TestServer {
    addr: SocketAddr,
    /// Client with a cookie store; one visitor per server by default.
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with short delays suitable for tests.
    pub async fn start() -> Self {
        Self::with_config(test_config()).await
    }

    /// Start a storefront with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn with_config(config: StorefrontConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let router = app(AppState::new(config));
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                panic!("test server failed: {e}");
            }
        });

        Self {
            addr,
            client: visitor_client(),
            handle,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A second, independent visitor.
    #[must_use]
    pub fn new_visitor(&self) -> Client {
        visitor_client()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Configuration used by [`TestServer::start`].
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        cart_open_delay: Duration::ZERO,
        payment_delay: Duration::from_millis(20),
        ..StorefrontConfig::default()
    }
}

fn visitor_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
