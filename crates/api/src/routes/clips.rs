//! Route definitions for the public `/clips` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::clips;
use crate::state::AppState;

/// Routes mounted at `/clips`.
///
/// ```text
/// GET    /                  -> list_feed    (?page=&limit=)
/// POST   /{id}/views        -> record_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clips::list_feed))
        .route("/{id}/views", post(clips::record_view))
}
