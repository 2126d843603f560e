//! Users mirrored from the identity provider.

use daydream_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table. `id` is the identity provider's subject.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for registering or refreshing a user.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}
