//! Authentication primitives.
//!
//! - [`jwt`] -- identity token validation.

pub mod jwt;
