//! Route definitions for the `/admin/clips` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::admin_clips;
use crate::state::AppState;

/// Routes mounted at `/admin/clips`.
///
/// ```text
/// GET    /                  -> list
/// PUT    /update            -> upsert
/// DELETE /delete            -> delete       (?id=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_clips::list))
        .route("/update", put(admin_clips::upsert))
        .route("/delete", delete(admin_clips::delete))
}
