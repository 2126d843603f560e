//! Admin access rule: admins are users whose email belongs to the
//! organisation domain.

/// Default organisation domain for admin access.
pub const DEFAULT_ADMIN_DOMAIN: &str = "livepeer.org";

/// Returns `true` if `email` is an address under `domain`.
///
/// The comparison is case-insensitive and requires the `@`, so
/// `someone@notlivepeer.org` does not match `livepeer.org`.
pub fn is_admin_email(email: Option<&str>, domain: &str) -> bool {
    let Some(email) = email else {
        return false;
    };
    let Some((local, host)) = email.trim().rsplit_once('@') else {
        return false;
    };
    !local.is_empty() && host.eq_ignore_ascii_case(domain)
}

/// Message returned when a non-admin reaches an admin route.
pub fn access_denied_message(domain: &str) -> String {
    format!("Unauthorized: Admin access restricted to {domain} users")
}
