//! Input validation helpers
//!
//! Text length constants, hand-written checks for shared payloads and a
//! bridge from `validator` derive errors to [`AppError`].

use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, category, customer, display name
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, cancel reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: username, phone
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Trim and drop empty optional strings
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── validator bridge ────────────────────────────────────────────────

/// Run `validator` derive rules; the first failing field goes into `details`.
pub fn validate_request<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    fields.sort();

    let message = match fields.first() {
        Some(first) => format!("Invalid value for {first}"),
        None => "Validation failed".to_string(),
    };
    AppError::validation(message).with_detail("fields", fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 1))]
        count: i32,
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Soup", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.details.unwrap().get("field").unwrap(), "name");
    }

    #[test]
    fn test_required_text_counts_chars_not_bytes() {
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_required_text(&name, "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" a ".into())), Some("a".into()));
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_validate_request() {
        let ok = Sample {
            name: "abc".into(),
            count: 1,
        };
        assert!(validate_request(&ok).is_ok());

        let bad = Sample {
            name: "abcdefg".into(),
            count: 0,
        };
        let err = validate_request(&bad).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid value for count");
        let fields = err.details.unwrap();
        assert_eq!(fields.get("fields").unwrap(), &serde_json::json!(["count", "name"]));
    }
}
