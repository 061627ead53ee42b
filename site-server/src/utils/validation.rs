//! Input validation helpers
//!
//! Centralized text length limits and validation functions shared by the
//! reservation form and the area tag admin endpoints.
//! SQLite TEXT has no built-in length enforcement.

use validator::ValidateEmail;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Guest names, tag names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, time slot, slug
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    check_max_len(value, field, max_len)
}

/// Validate a required string with a minimum trimmed length.
pub fn validate_min_text(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    if value.trim().chars().count() < min_len {
        return Err(AppError::validation(format!(
            "{field} must be at least {min_len} characters"
        ))
        .with_detail("field", field));
    }
    check_max_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        check_max_len(v, field, max_len)?;
    }
    Ok(())
}

/// Validate an email address format.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    check_max_len(value, "email", MAX_EMAIL_LEN)?;
    if !value.trim().validate_email() {
        return Err(AppError::validation("Enter a valid email").with_detail("field", "email"));
    }
    Ok(())
}

/// Validate an area tag slug: `^[a-z0-9-]+$`, at least 2 characters.
pub fn validate_slug(value: &str) -> Result<(), AppError> {
    let well_formed = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if value.len() < 2 || !well_formed {
        return Err(AppError::validation(
            "Slug must be at least 2 characters of lowercase letters, digits or hyphens",
        )
        .with_detail("field", "slug")
        .with_detail("value", value));
    }
    check_max_len(value, "slug", MAX_SHORT_TEXT_LEN)
}

fn check_max_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Trim an optional string, mapping blank values to `None`.
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
