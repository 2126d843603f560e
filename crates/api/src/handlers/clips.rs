//! Handlers for the public `/clips` resource.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use daydream_core::clip_ranking::{assign_slots, SlotWarning};
use daydream_core::clips::client_ip;
use daydream_core::error::CoreError;
use daydream_core::pagination::FeedPage;
use daydream_core::types::DbId;
use daydream_db::models::clip::FeedClip;
use daydream_db::models::clip_view::CreateClipView;
use daydream_db::models::user::UpsertUser;
use daydream_db::repositories::{ClipRepo, ClipViewRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::FeedParams;
use crate::response::MessageResponse;
use crate::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch clips";
const VIEW_FAILED: &str = "Failed to log clip view";

/// One page of the public feed.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub clips: Vec<FeedClip>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Body of a view beacon.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordViewRequest {
    pub session_id: Option<String>,
}

/// Log the non-fatal anomalies found during slot assignment.
pub(crate) fn log_slot_warnings(warnings: &[SlotWarning]) {
    for warning in warnings {
        match warning {
            SlotWarning::InvalidPriority { clip_id, priority } => {
                tracing::warn!(clip_id, ?priority, "Invalid clip priority, ranking as unprioritized");
            }
            SlotWarning::PriorityCollision {
                slot,
                displaced,
                winner,
                policy,
            } => {
                tracing::warn!(
                    slot,
                    displaced,
                    winner,
                    policy = policy.as_str(),
                    "Duplicate clip priority, later clip keeps the slot"
                );
            }
        }
    }
}

/// GET /api/clips?page=&limit=
///
/// Completed, approved clips in slot order, one page at a time.
pub async fn list_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<FeedResponse>> {
    let page = FeedPage::new(params.page, params.limit)?;

    let (prioritized, unprioritized) = tokio::try_join!(
        ClipRepo::list_feed_prioritized(&state.pool),
        ClipRepo::list_feed_unprioritized(&state.pool),
    )
    .map_err(AppError::operation(FETCH_FAILED))?;

    let assignment = assign_slots(prioritized, unprioritized, state.config.collision_policy);
    log_slot_warnings(&assignment.warnings);

    let (clips, has_more) = page.slice(assignment.clips);
    Ok(Json(FeedResponse { clips, has_more }))
}

/// POST /api/clips/{id}/views
///
/// Records a view. Signed-in viewers are attributed; anonymous views are
/// recorded without a user.
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    viewer: Option<AuthUser>,
    headers: HeaderMap,
    Json(body): Json<RecordViewRequest>,
) -> AppResult<Json<MessageResponse>> {
    ClipRepo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::operation(VIEW_FAILED))?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Clip", id }))?;

    if let Some(viewer) = &viewer {
        UserRepo::upsert(
            &state.pool,
            &UpsertUser {
                id: viewer.user_id.clone(),
                name: None,
                email: viewer.email.clone(),
            },
        )
        .await
        .map_err(AppError::operation(VIEW_FAILED))?;
    }

    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());

    let view = ClipViewRepo::record(
        &state.pool,
        &CreateClipView {
            clip_id: id,
            viewer_user_id: viewer.map(|v| v.user_id),
            ip_address: Some(client_ip(forwarded_for)),
            session_id: body.session_id,
        },
    )
    .await
    .map_err(AppError::operation(VIEW_FAILED))?;

    tracing::debug!(clip_id = id, view_id = view.id, "Clip view recorded");
    Ok(Json(MessageResponse::new("Clip view recorded successfully")))
}
