//! Admin access extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use daydream_core::admin_access::{access_denied_message, is_admin_email};
use daydream_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a caller whose email is under the configured admin domain.
/// Rejects with 401 without a valid token and 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;
        let domain = &state.config.admin_domain;
        if !is_admin_email(user.email.as_deref(), domain) {
            tracing::warn!(user_id = %user.user_id, "Rejected non-admin caller");
            return Err(AppError::Core(CoreError::Forbidden(access_denied_message(
                domain,
            ))));
        }
        Ok(RequireAdmin(user))
    }
}
