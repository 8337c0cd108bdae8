//! Visitor extractor.
//!
//! Resolves the session's visitor id (minting one on first contact) and hands
//! the handler that visitor's shared state.

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio::sync::MutexGuard;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{VisitorState, session_keys};
use crate::services::VisitorHandle;
use crate::state::AppState;

/// The current visitor's cart and checkout state.
///
/// # Example
///
/// ```rust,ignore
/// async fn count(visitor: Visitor) -> String {
///     visitor.lock().await.cart.len().to_string()
/// }
/// ```
pub struct Visitor {
    id: Uuid,
    handle: VisitorHandle,
}

impl Visitor {
    /// The visitor's id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Lock the visitor's state. Requests from one visitor are serialised here.
    pub async fn lock(&self) -> MutexGuard<'_, VisitorState> {
        self.handle.lock().await
    }

    /// A handle that outlives the request, for work that must finish even if
    /// the client goes away.
    #[must_use]
    pub fn handle(&self) -> VisitorHandle {
        VisitorHandle::clone(&self.handle)
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = match session.get::<Uuid>(session_keys::VISITOR_ID).await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session.insert(session_keys::VISITOR_ID, id).await?;
                tracing::debug!(visitor_id = %id, "new visitor");
                id
            }
        };

        let handle = state.visitors().handle(id).await;
        Ok(Self { id, handle })
    }
}
