//! Input validation helpers
//!
//! Text length limits plus the bridge from `validator` derive errors to
//! [`AppError`].

use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Product and customer names
pub const MIN_NAME_LEN: usize = 5;
pub const MAX_NAME_LEN: usize = 200;

/// Review comments
pub const MAX_COMMENT_LEN: usize = 500;

/// External image URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Helpers ─────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length bounds.
pub fn validate_required_text(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(AppError::required(field));
    }
    if len < min_len {
        return Err(AppError::validation(format!(
            "{field} must be at least {min_len} characters"
        ))
        .with_detail("field", field));
    }
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an optional external URL (http/https only).
pub fn validate_optional_url(value: &Option<String>, field: &str) -> Result<(), AppError> {
    if let Some(url) = value {
        if url.len() > MAX_URL_LEN {
            return Err(AppError::validation(format!("{field} is too long")));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::validation(format!("{field} must be an http(s) URL"))
                .with_detail("field", field));
        }
    }
    Ok(())
}

/// Run derive-based validation and convert the first failure into an [`AppError`].
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(into_app_error)
}

fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let Some((field, errs)) = fields.first() else {
        return AppError::validation("One of the fields is not correct");
    };
    let message = errs
        .first()
        .and_then(|e| e.message.as_ref())
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field));

    AppError::validation(message).with_detail("field", field.to_string())
}
