//! Clip view entity model and DTOs.

use daydream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `clip_views` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClipView {
    pub id: DbId,
    pub clip_id: DbId,
    pub viewer_user_id: Option<String>,
    pub viewed_at: Timestamp,
    pub ip_address: Option<String>,
    pub session_id: Option<String>,
}

/// DTO for recording a clip view.
#[derive(Debug, Clone)]
pub struct CreateClipView {
    pub clip_id: DbId,
    pub viewer_user_id: Option<String>,
    pub ip_address: Option<String>,
    pub session_id: Option<String>,
}
