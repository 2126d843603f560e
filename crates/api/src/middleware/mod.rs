//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from an identity Bearer token.
//!   Also usable as `Option<AuthUser>` on routes where sign-in is optional.
//! - [`admin::RequireAdmin`] -- Requires an email under the admin domain.

pub mod admin;
pub mod auth;
