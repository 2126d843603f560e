//! Clip entity model, ranking row types, and DTOs.

use daydream_core::clip_ranking::RankedClip;
use daydream_core::error::CoreError;
use daydream_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::deserialize_present;

/// A row from the `clips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Clip {
    pub id: DbId,
    pub video_url: String,
    pub video_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author_user_id: String,
    pub source_clip_id: Option<DbId>,
    pub remix_count: Option<i32>,
    pub prompt: String,
    pub priority: Option<i32>,
    pub status: String,
    pub is_tutorial: bool,
    pub approval_status: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// A clip together with its public slug.
#[derive(Debug, Clone, Serialize)]
pub struct ClipWithSlug {
    #[serde(flatten)]
    pub clip: Clip,
    pub slug: String,
}

// ---------------------------------------------------------------------------
// Admin listing
// ---------------------------------------------------------------------------

/// Flat row behind the admin clip listing.
///
/// `remix_count` is computed from live child clips rather than read from the
/// stored counter. The author columns come from a LEFT JOIN and are null
/// when the author row is gone.
#[derive(Debug, Clone, FromRow)]
pub struct AdminClipRow {
    pub id: DbId,
    pub video_url: String,
    pub video_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author_user_id: String,
    pub source_clip_id: Option<DbId>,
    pub prompt: String,
    pub priority: Option<i32>,
    pub remix_count: Option<i32>,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
}

/// Author summary embedded in admin clip responses.
#[derive(Debug, Clone, Serialize)]
pub struct ClipAuthor {
    pub id: String,
    pub name: Option<String>,
}

/// Admin clip as returned to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminClip {
    pub id: DbId,
    pub video_url: String,
    pub video_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author_user_id: String,
    pub source_clip_id: Option<DbId>,
    pub prompt: String,
    pub priority: Option<i32>,
    pub remix_count: Option<i32>,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub author: Option<ClipAuthor>,
}

impl From<AdminClipRow> for AdminClip {
    fn from(row: AdminClipRow) -> Self {
        let author = row.author_id.map(|id| ClipAuthor {
            id,
            name: row.author_name,
        });
        Self {
            id: row.id,
            video_url: row.video_url,
            video_title: row.video_title,
            thumbnail_url: row.thumbnail_url,
            author_user_id: row.author_user_id,
            source_clip_id: row.source_clip_id,
            prompt: row.prompt,
            priority: row.priority,
            remix_count: row.remix_count,
            created_at: row.created_at,
            deleted_at: row.deleted_at,
            author,
        }
    }
}

impl RankedClip for AdminClipRow {
    fn id(&self) -> DbId {
        self.id
    }
    fn priority(&self) -> Option<i32> {
        self.priority
    }
    fn remix_count(&self) -> Option<i32> {
        self.remix_count
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// Public feed
// ---------------------------------------------------------------------------

/// A clip as shown in the public feed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedClip {
    pub id: DbId,
    pub video_url: String,
    pub video_title: Option<String>,
    pub created_at: Timestamp,
    pub author_name: Option<String>,
    pub prompt: String,
    pub remix_count: Option<i32>,
    pub slug: Option<String>,
    pub priority: Option<i32>,
    pub is_tutorial: bool,
}

impl RankedClip for FeedClip {
    fn id(&self) -> DbId {
        self.id
    }
    fn priority(&self) -> Option<i32> {
        self.priority
    }
    fn remix_count(&self) -> Option<i32> {
        self.remix_count
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a clip from the admin tools.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClip {
    pub video_url: String,
    pub video_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author_user_id: String,
    pub source_clip_id: Option<DbId>,
    pub prompt: String,
    pub priority: Option<i32>,
    pub status: Option<String>,
    pub is_tutorial: Option<bool>,
    pub approval_status: Option<String>,
}

/// DTO for partially updating a clip.
///
/// Nullable columns use `Option<Option<T>>`: the outer `None` leaves the
/// column alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClip {
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub video_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub thumbnail_url: Option<Option<String>>,
    pub author_user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub source_clip_id: Option<Option<DbId>>,
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub priority: Option<Option<i32>>,
    pub status: Option<String>,
    pub is_tutorial: Option<bool>,
    pub approval_status: Option<String>,
}

impl TryFrom<UpdateClip> for CreateClip {
    type Error = CoreError;

    /// Promote a field set to an insert. `video_url`, `author_user_id` and
    /// `prompt` are required.
    fn try_from(fields: UpdateClip) -> Result<Self, Self::Error> {
        let missing = |name: &str| CoreError::Validation(format!("'{name}' is required"));
        Ok(Self {
            video_url: fields.video_url.ok_or_else(|| missing("video_url"))?,
            video_title: fields.video_title.flatten(),
            thumbnail_url: fields.thumbnail_url.flatten(),
            author_user_id: fields
                .author_user_id
                .ok_or_else(|| missing("author_user_id"))?,
            source_clip_id: fields.source_clip_id.flatten(),
            prompt: fields.prompt.ok_or_else(|| missing("prompt"))?,
            priority: fields.priority.flatten(),
            status: fields.status,
            is_tutorial: fields.is_tutorial,
            approval_status: fields.approval_status,
        })
    }
}
