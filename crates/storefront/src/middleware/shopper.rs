//! Shopper extractor.
//!
//! Resolves the visitor's `ShopperId` from the cookie session, minting one on
//! first contact, and hands the handler that shopper's live session.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use agritech_core::ShopperId;

use crate::error::AppError;
use crate::middleware::session::keys;
use crate::services::SharedSession;
use crate::state::AppState;

/// The current visitor and their cart and checkout state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(shopper: CurrentShopper) -> impl IntoResponse {
///     let session = shopper.session.lock().await;
///     format!("{} items", session.cart().total_quantity())
/// }
/// ```
pub struct CurrentShopper {
    pub id: ShopperId,
    pub session: SharedSession,
}

impl FromRequestParts<AppState> for CurrentShopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = if let Some(id) = session.get::<ShopperId>(keys::SHOPPER_ID).await? {
            id
        } else {
            let id = ShopperId::generate();
            session.insert(keys::SHOPPER_ID, id).await?;
            tracing::debug!(shopper = %id, "New shopper");
            id
        };

        let shopper_session = state.shoppers().get_or_create(id).await;
        Ok(Self {
            id,
            session: shopper_session,
        })
    }
}
