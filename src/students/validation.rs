//! Field checks applied to write payloads before they reach the store.

use super::types::{StudentDraft, ValidationError};
use regex::Regex;
use std::sync::LazyLock;

/// Accepted email shape. Matching is case-sensitive: uppercase letters are rejected.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("email pattern compiles")
});

/// Check `draft` against the write rules in order; the first failing rule is reported.
pub fn validate_draft(draft: &StudentDraft) -> Result<(), ValidationError> {
    if draft.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if draft.age < 0 {
        return Err(ValidationError::NegativeAge);
    }
    if !is_valid_email(&draft.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Whether `email` matches the accepted `local@domain.tld` shape exactly as given.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
