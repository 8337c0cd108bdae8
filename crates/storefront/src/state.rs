//! Application state shared across handlers.

use std::sync::Arc;

use ethos_core::Catalog;

use crate::config::StorefrontConfig;
use crate::services::{PaymentGateway, SimulatedProcessor, VisitorStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, per-visitor state, and the payment gateway.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    visitors: VisitorStore,
    payments: PaymentGateway,
}

impl AppState {
    /// Create application state with the Ethos catalog and a simulated
    /// gateway using the configured payment delay.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let payments = SimulatedProcessor::new(config.payment_delay).into();
        Self::with_parts(config, Catalog::ethos(), payments)
    }

    /// Create application state from explicit parts.
    #[must_use]
    pub fn with_parts(config: StorefrontConfig, catalog: Catalog, payments: PaymentGateway) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                visitors: VisitorStore::new(),
                payments,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the per-visitor state store.
    #[must_use]
    pub fn visitors(&self) -> &VisitorStore {
        &self.inner.visitors
    }

    /// Get a reference to the payment gateway.
    #[must_use]
    pub fn payments(&self) -> &PaymentGateway {
        &self.inner.payments
    }
}
