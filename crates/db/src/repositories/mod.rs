//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod clip_repo;
pub mod clip_view_repo;
pub mod user_repo;

pub use clip_repo::ClipRepo;
pub use clip_view_repo::ClipViewRepo;
pub use user_repo::UserRepo;
