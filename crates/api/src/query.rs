//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Public feed pagination (`?page=&limit=`). Validated by `FeedPage`.
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Target of an admin delete (`?id=`).
///
/// Kept as a string so a missing or malformed id produces the same 400.
#[derive(Debug, Deserialize)]
pub struct ClipIdParams {
    pub id: Option<String>,
}
