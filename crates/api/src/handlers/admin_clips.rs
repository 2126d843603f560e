//! Handlers for the `/admin/clips` resource.
//!
//! All routes require [`RequireAdmin`].

use axum::extract::{Query, State};
use axum::Json;
use daydream_core::clip_ranking::assign_slots;
use daydream_core::clips::{
    generate_slug, validate_approval_status, validate_priority, validate_status,
    ADMIN_SLUG_LENGTH,
};
use daydream_core::error::CoreError;
use daydream_core::types::DbId;
use daydream_db::models::clip::{AdminClip, ClipWithSlug, CreateClip, UpdateClip};
use daydream_db::repositories::ClipRepo;
use serde::{Deserialize, Serialize};

use super::clips::log_slot_warnings;
use crate::error::{AppError, AppResult};
use crate::middleware::admin::RequireAdmin;
use crate::query::ClipIdParams;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Body of an admin upsert: `id = 0` creates, any other id updates.
///
/// `id` stays raw JSON so a missing, null or malformed id all get the same
/// 400 instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct UpsertClipRequest {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(flatten)]
    pub fields: UpdateClip,
}

/// Accept an integer id or a string holding one.
fn parse_clip_id(value: Option<&serde_json::Value>) -> Option<DbId> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct UpsertClipResponse {
    pub message: &'static str,
    pub clip: ClipWithSlug,
}

/// GET /api/admin/clips
///
/// Every live clip with a thumbnail, in the order the public feed shows it.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminClip>>> {
    let (prioritized, unprioritized) = tokio::try_join!(
        ClipRepo::list_admin_prioritized(&state.pool),
        ClipRepo::list_admin_unprioritized(&state.pool),
    )
    .map_err(AppError::operation("Failed to fetch clips"))?;

    let assignment = assign_slots(prioritized, unprioritized, state.config.collision_policy);
    log_slot_warnings(&assignment.warnings);

    Ok(Json(
        assignment.clips.into_iter().map(AdminClip::from).collect(),
    ))
}

/// Reject field values the database would accept but the feed cannot use.
fn validate_fields(fields: &UpdateClip) -> Result<(), CoreError> {
    if let Some(priority) = fields.priority {
        validate_priority(priority)?;
    }
    if let Some(status) = &fields.status {
        validate_status(status)?;
    }
    if let Some(approval_status) = &fields.approval_status {
        validate_approval_status(approval_status)?;
    }
    Ok(())
}

/// PUT /api/admin/clips/update
///
/// Creates a clip when `id` is 0, otherwise applies the supplied fields.
/// Either way the clip ends up with a slug.
pub async fn upsert(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<UpsertClipRequest>,
) -> AppResult<Json<UpsertClipResponse>> {
    let id = parse_clip_id(body.id.as_ref())
        .ok_or_else(|| AppError::BadRequest("Clip ID is required".into()))?;
    validate_fields(&body.fields)?;

    let slug = generate_slug(ADMIN_SLUG_LENGTH);

    if id == 0 {
        let input = CreateClip::try_from(body.fields)?;
        let clip = ClipRepo::create_with_slug(&state.pool, &input, &slug)
            .await
            .map_err(AppError::operation("Failed to create clip"))?;

        tracing::info!(clip_id = clip.id, admin = %admin.user_id, "Clip created");
        return Ok(Json(UpsertClipResponse {
            message: "Clip created successfully",
            clip: ClipWithSlug { clip, slug },
        }));
    }

    let (clip, slug) = ClipRepo::update_with_slug(&state.pool, id, &body.fields, &slug)
        .await
        .map_err(AppError::operation("Failed to update clip"))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Clip", id }))?;

    tracing::info!(clip_id = id, admin = %admin.user_id, "Clip updated");
    Ok(Json(UpsertClipResponse {
        message: "Clip updated successfully",
        clip: ClipWithSlug { clip, slug },
    }))
}

/// DELETE /api/admin/clips/delete?id=
///
/// Soft-deletes a clip.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<ClipIdParams>,
) -> AppResult<Json<MessageResponse>> {
    let id: DbId = params
        .id
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| AppError::BadRequest("Clip ID is required".into()))?;

    let deleted = ClipRepo::soft_delete(&state.pool, id)
        .await
        .map_err(AppError::operation("Failed to delete clip"))?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Clip", id }));
    }

    tracing::info!(clip_id = id, admin = %admin.user_id, "Clip deleted");
    Ok(Json(MessageResponse::new("Clip deleted successfully")))
}
