//! Clip lifecycle constants, field validation, and slug generation.

use rand::Rng;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_UPLOADING: &str = "uploading";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

/// All valid clip processing states.
pub const VALID_STATUSES: &[&str] = &[STATUS_UPLOADING, STATUS_COMPLETED, STATUS_FAILED];

pub const APPROVAL_NONE: &str = "none";
pub const APPROVAL_PENDING: &str = "pending";
pub const APPROVAL_APPROVED: &str = "approved";
pub const APPROVAL_REJECTED: &str = "rejected";

/// All valid feed approval states.
pub const VALID_APPROVAL_STATUSES: &[&str] = &[
    APPROVAL_NONE,
    APPROVAL_PENDING,
    APPROVAL_APPROVED,
    APPROVAL_REJECTED,
];

/// Characters allowed in a clip slug.
pub const SLUG_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of slugs minted by the admin tools.
pub const ADMIN_SLUG_LENGTH: usize = 10;

/// Longest IP address string stored with a clip view (IPv6 textual form).
pub const MAX_IP_ADDRESS_LENGTH: usize = 45;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid status '{status}'. Must be one of: {}",
        VALID_STATUSES.join(", ")
    )))
}

pub fn validate_approval_status(status: &str) -> Result<(), CoreError> {
    if VALID_APPROVAL_STATUSES.contains(&status) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid approval status '{status}'. Must be one of: {}",
        VALID_APPROVAL_STATUSES.join(", ")
    )))
}

/// A stored priority must request a real slot. `None` clears it.
pub fn validate_priority(priority: Option<i32>) -> Result<(), CoreError> {
    match priority {
        Some(p) if p < 1 => Err(CoreError::Validation(format!(
            "Priority must be a positive slot number, got {p}"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Generate a random slug of `len` characters from [`SLUG_ALPHABET`].
pub fn generate_slug(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| SLUG_ALPHABET[rng.random_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

/// Extract the client IP from an `X-Forwarded-For` value.
///
/// Uses the first (client-most) entry, falls back to loopback, and truncates
/// to the column width.
pub fn client_ip(forwarded_for: Option<&str>) -> String {
    let ip = forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("127.0.0.1");
    ip.chars().take(MAX_IP_ADDRESS_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_validate() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("processing").is_err());
    }

    #[test]
    fn known_approval_statuses_validate() {
        for s in VALID_APPROVAL_STATUSES {
            assert!(validate_approval_status(s).is_ok());
        }
        assert!(validate_approval_status("maybe").is_err());
    }

    #[test]
    fn priority_must_be_positive_or_absent() {
        assert!(validate_priority(None).is_ok());
        assert!(validate_priority(Some(1)).is_ok());
        assert!(validate_priority(Some(0)).is_err());
        assert!(validate_priority(Some(-2)).is_err());
    }

    #[test]
    fn slug_has_requested_length_and_alphabet() {
        let slug = generate_slug(ADMIN_SLUG_LENGTH);
        assert_eq!(slug.len(), ADMIN_SLUG_LENGTH);
        assert!(slug.bytes().all(|b| SLUG_ALPHABET.contains(&b)));
    }

    #[test]
    fn client_ip_uses_first_forwarded_entry() {
        assert_eq!(client_ip(Some("203.0.113.9, 10.0.0.1")), "203.0.113.9");
    }

    #[test]
    fn client_ip_falls_back_to_loopback() {
        assert_eq!(client_ip(None), "127.0.0.1");
        assert_eq!(client_ip(Some("  ")), "127.0.0.1");
    }
}
