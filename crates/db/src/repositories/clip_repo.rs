//! Repository for the `clips` and `clip_slugs` tables.

use daydream_core::clips::{APPROVAL_APPROVED, STATUS_COMPLETED};
use daydream_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::clip::{AdminClipRow, Clip, CreateClip, FeedClip, UpdateClip};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_url, video_title, thumbnail_url, author_user_id, \
    source_clip_id, remix_count, prompt, priority, status, is_tutorial, approval_status, \
    approved_by, approved_at, created_at, deleted_at";

/// Admin listing columns. `remix_count` counts live clips derived from each row.
const ADMIN_SELECT: &str = "SELECT c.id, c.video_url, c.video_title, c.thumbnail_url, \
        c.author_user_id, c.source_clip_id, c.prompt, c.priority, \
        (SELECT COUNT(*)::INTEGER FROM clips r \
         WHERE r.source_clip_id = c.id AND r.deleted_at IS NULL) AS remix_count, \
        c.created_at, c.deleted_at, u.id AS author_id, u.name AS author_name \
     FROM clips c \
     LEFT JOIN users u ON u.id = c.author_user_id \
     WHERE c.deleted_at IS NULL AND c.thumbnail_url IS NOT NULL";

/// Feed columns. Only completed, approved clips with a known author appear.
/// `remix_count` is counted live, as in the admin listing.
const FEED_SELECT: &str = "SELECT c.id, c.video_url, c.video_title, c.created_at, \
        u.name AS author_name, c.prompt, \
        (SELECT COUNT(*)::INTEGER FROM clips r \
         WHERE r.source_clip_id = c.id AND r.deleted_at IS NULL) AS remix_count, \
        s.slug, c.priority, c.is_tutorial \
     FROM clips c \
     INNER JOIN users u ON u.id = c.author_user_id \
     LEFT JOIN clip_slugs s ON s.clip_id = c.id \
     WHERE c.deleted_at IS NULL AND c.status = $1 AND c.approval_status = $2";

/// Provides listing, upsert and soft-delete operations for clips.
pub struct ClipRepo;

impl ClipRepo {
    // ── Ranking sources ──────────────────────────────────────────────

    /// Admin clips that request a slot, ascending by priority.
    ///
    /// Ties are broken by age and id so slot collisions resolve the same
    /// way on every request.
    pub async fn list_admin_prioritized(pool: &PgPool) -> Result<Vec<AdminClipRow>, sqlx::Error> {
        let query = format!(
            "{ADMIN_SELECT} AND c.priority IS NOT NULL \
             ORDER BY c.priority ASC, c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, AdminClipRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Admin clips without a slot request, most remixed first, then oldest.
    pub async fn list_admin_unprioritized(
        pool: &PgPool,
    ) -> Result<Vec<AdminClipRow>, sqlx::Error> {
        let query = format!(
            "{ADMIN_SELECT} AND c.priority IS NULL \
             ORDER BY remix_count DESC NULLS LAST, c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, AdminClipRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Feed clips that request a slot, ascending by priority.
    pub async fn list_feed_prioritized(pool: &PgPool) -> Result<Vec<FeedClip>, sqlx::Error> {
        let query = format!(
            "{FEED_SELECT} AND c.priority IS NOT NULL \
             ORDER BY c.priority ASC, c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, FeedClip>(&query)
            .bind(STATUS_COMPLETED)
            .bind(APPROVAL_APPROVED)
            .fetch_all(pool)
            .await
    }

    /// Feed clips without a slot request, most remixed first, then oldest.
    pub async fn list_feed_unprioritized(pool: &PgPool) -> Result<Vec<FeedClip>, sqlx::Error> {
        let query = format!(
            "{FEED_SELECT} AND c.priority IS NULL \
             ORDER BY remix_count DESC NULLS LAST, c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, FeedClip>(&query)
            .bind(STATUS_COMPLETED)
            .bind(APPROVAL_APPROVED)
            .fetch_all(pool)
            .await
    }

    // ── Standard CRUD ────────────────────────────────────────────────

    /// Find a clip by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Clip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clips WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Clip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the public slug of a clip, if one was minted.
    pub async fn find_slug(pool: &PgPool, clip_id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT slug FROM clip_slugs WHERE clip_id = $1")
            .bind(clip_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a clip and its slug in one transaction.
    ///
    /// When the clip is a remix, the source clip's stored `remix_count` is
    /// bumped in the same transaction.
    pub async fn create_with_slug(
        pool: &PgPool,
        input: &CreateClip,
        slug: &str,
    ) -> Result<Clip, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO clips
                (video_url, video_title, thumbnail_url, author_user_id, source_clip_id,
                 prompt, priority, status, is_tutorial, approval_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     COALESCE($8, 'uploading'), COALESCE($9, false), COALESCE($10, 'none'))
             RETURNING {COLUMNS}"
        );
        let clip = sqlx::query_as::<_, Clip>(&query)
            .bind(&input.video_url)
            .bind(&input.video_title)
            .bind(&input.thumbnail_url)
            .bind(&input.author_user_id)
            .bind(input.source_clip_id)
            .bind(&input.prompt)
            .bind(input.priority)
            .bind(&input.status)
            .bind(input.is_tutorial)
            .bind(&input.approval_status)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO clip_slugs (slug, clip_id) VALUES ($1, $2)")
            .bind(slug)
            .bind(clip.id)
            .execute(&mut *tx)
            .await?;

        if let Some(source_id) = input.source_clip_id {
            adjust_remix_count(&mut *tx, source_id, 1).await?;
        }

        tx.commit().await?;
        Ok(clip)
    }

    /// Update a clip and make sure it has a slug, in one transaction.
    ///
    /// Only supplied fields are changed. `fallback_slug` is inserted when the
    /// clip has none yet. Re-pointing `source_clip_id` moves one remix from
    /// the old source's counter to the new one. Returns `None` if no clip has
    /// the given `id`.
    pub async fn update_with_slug(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClip,
        fallback_slug: &str,
    ) -> Result<Option<(Clip, String)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous_source: Option<Option<DbId>> =
            sqlx::query_scalar("SELECT source_clip_id FROM clips WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let query = format!(
            "UPDATE clips SET
                video_url       = COALESCE($2, video_url),
                video_title     = CASE WHEN $3 THEN $4 ELSE video_title END,
                thumbnail_url   = CASE WHEN $5 THEN $6 ELSE thumbnail_url END,
                author_user_id  = COALESCE($7, author_user_id),
                source_clip_id  = CASE WHEN $8 THEN $9 ELSE source_clip_id END,
                prompt          = COALESCE($10, prompt),
                priority        = CASE WHEN $11 THEN $12 ELSE priority END,
                status          = COALESCE($13, status),
                is_tutorial     = COALESCE($14, is_tutorial),
                approval_status = COALESCE($15, approval_status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Clip>(&query)
            .bind(id)
            .bind(&input.video_url)
            .bind(input.video_title.is_some())
            .bind(input.video_title.as_ref().and_then(|v| v.as_deref()))
            .bind(input.thumbnail_url.is_some())
            .bind(input.thumbnail_url.as_ref().and_then(|v| v.as_deref()))
            .bind(&input.author_user_id)
            .bind(input.source_clip_id.is_some())
            .bind(input.source_clip_id.flatten())
            .bind(&input.prompt)
            .bind(input.priority.is_some())
            .bind(input.priority.flatten())
            .bind(&input.status)
            .bind(input.is_tutorial)
            .bind(&input.approval_status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(clip) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        let previous_source = previous_source.flatten();
        if clip.deleted_at.is_none() && previous_source != clip.source_clip_id {
            if let Some(old) = previous_source {
                adjust_remix_count(&mut *tx, old, -1).await?;
            }
            if let Some(new) = clip.source_clip_id {
                adjust_remix_count(&mut *tx, new, 1).await?;
            }
        }

        let existing: Option<String> =
            sqlx::query_scalar("SELECT slug FROM clip_slugs WHERE clip_id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let slug = match existing {
            Some(slug) => slug,
            None => {
                sqlx::query("INSERT INTO clip_slugs (slug, clip_id) VALUES ($1, $2)")
                    .bind(fallback_slug)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                fallback_slug.to_string()
            }
        };

        tx.commit().await?;
        Ok(Some((clip, slug)))
    }

    /// Soft-delete a clip by ID. Returns `true` if a row was marked deleted.
    ///
    /// A deleted remix no longer counts towards its source's `remix_count`.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<Option<DbId>> = sqlx::query_scalar(
            "UPDATE clips SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING source_clip_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(source) = deleted else {
            tx.rollback().await?;
            return Ok(false);
        };
        if let Some(source_id) = source {
            adjust_remix_count(&mut *tx, source_id, -1).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

/// Shift a clip's stored remix counter by `delta`, never below zero.
async fn adjust_remix_count(
    conn: &mut PgConnection,
    clip_id: DbId,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE clips SET remix_count = GREATEST(COALESCE(remix_count, 0) + $2, 0) \
         WHERE id = $1",
    )
    .bind(clip_id)
    .bind(delta)
    .execute(conn)
    .await?;
    Ok(())
}
