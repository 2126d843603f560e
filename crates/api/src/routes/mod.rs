pub mod admin;
pub mod clips;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clips                     public feed (GET, ?page=&limit=)
/// /clips/{id}/views          record a view (POST, optional auth)
///
/// /admin/clips               slot-ordered listing (GET, admin only)
/// /admin/clips/update        create or update (PUT, admin only)
/// /admin/clips/delete        soft delete (DELETE, ?id=, admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clips", clips::router())
        .nest("/admin/clips", admin::router())
}
