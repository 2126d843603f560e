//! Domain logic for the Daydream clips service.
//!
//! This crate has no database or HTTP dependencies. Everything here works on
//! data already loaded by the caller.

pub mod admin_access;
pub mod clip_ranking;
pub mod clips;
pub mod error;
pub mod pagination;
pub mod types;
