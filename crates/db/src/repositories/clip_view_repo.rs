//! Repository for the `clip_views` table.

use daydream_core::types::DbId;
use sqlx::PgPool;

use crate::models::clip_view::{ClipView, CreateClipView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, clip_id, viewer_user_id, viewed_at, ip_address, session_id";

/// Records and counts clip views.
pub struct ClipViewRepo;

impl ClipViewRepo {
    /// Insert a view row.
    pub async fn record(pool: &PgPool, input: &CreateClipView) -> Result<ClipView, sqlx::Error> {
        let query = format!(
            "INSERT INTO clip_views (clip_id, viewer_user_id, ip_address, session_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClipView>(&query)
            .bind(input.clip_id)
            .bind(&input.viewer_user_id)
            .bind(&input.ip_address)
            .bind(&input.session_id)
            .fetch_one(pool)
            .await
    }

    /// Total number of recorded views for a clip.
    pub async fn count_for_clip(pool: &PgPool, clip_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clip_views WHERE clip_id = $1")
            .bind(clip_id)
            .fetch_one(pool)
            .await
    }
}
