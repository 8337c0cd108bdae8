//! In-memory store of per-visitor state.
//!
//! Each visitor's [`VisitorState`] sits behind its own async mutex so that
//! requests from the same visitor are applied one at a time, while different
//! visitors never contend. Entries expire after a week without access, the
//! same horizon as the session cookie.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::VisitorState;

/// Shared, lockable state for one visitor.
pub type VisitorHandle = Arc<Mutex<VisitorState>>;

/// Idle time after which a visitor's cart is forgotten (7 days).
const VISITOR_IDLE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Upper bound on remembered visitors.
const MAX_VISITORS: u64 = 100_000;

/// Visitor id to state, with idle expiry.
#[derive(Clone)]
pub struct VisitorStore {
    cache: Cache<Uuid, VisitorHandle>,
}

impl VisitorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_VISITORS)
                .time_to_idle(VISITOR_IDLE)
                .build(),
        }
    }

    /// The visitor's state, created empty on first use.
    pub async fn handle(&self, id: Uuid) -> VisitorHandle {
        self.cache
            .get_with(id, async { Arc::new(Mutex::new(VisitorState::default())) })
            .await
    }
}

impl Default for VisitorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VisitorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
