//! Request handlers.
//!
//! Handlers delegate to the repositories in `daydream_db`, run slot
//! assignment from `daydream_core`, and map errors via [`crate::error::AppError`].

pub mod admin_clips;
pub mod clips;
