//! Field validation for todo inputs
//!
//! Rules run before any state change. Each rule reports a `FieldError`
//! so callers can show messages next to the offending input.

use crate::error::{DbError, DbResult, FieldError};
use crate::models::{CoverUpload, NewTodo};
use crate::repository::TodoUpdate;
use crate::storage::ImageKind;

/// Maximum title length in characters
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum cover size in kilobytes
pub const MAX_COVER_KILOBYTES: usize = 2048;

/// Check a title against the required/max-length rules
fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    let title = title.trim();
    if title.is_empty() {
        errors.push(FieldError::new("title", "The title field is required."));
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!(
                "The title field must not be greater than {} characters.",
                MAX_TITLE_LENGTH
            ),
        ));
    }
}

/// Turn collected field errors into a result
fn finish(errors: Vec<FieldError>) -> DbResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DbError::Validation { errors })
    }
}

/// Validate the input for a new todo.
pub fn validate_new_todo(new: &NewTodo) -> DbResult<()> {
    let mut errors = Vec::new();
    check_title(&new.title, &mut errors);
    finish(errors)
}

/// Validate a partial update. Only fields present in the update are checked.
pub fn validate_update(update: &TodoUpdate) -> DbResult<()> {
    let mut errors = Vec::new();
    if let Some(title) = &update.title {
        check_title(title, &mut errors);
    }
    finish(errors)
}

/// Validate an uploaded cover and detect its image format.
///
/// The format comes from the file content, not from a name or a
/// client-supplied content type. Uploads over the size limit are only
/// checked for an image signature and are never decoded.
pub fn validate_cover(upload: &CoverUpload) -> DbResult<ImageKind> {
    if upload.is_empty() {
        return Err(DbError::validation("cover", "The cover field is required."));
    }

    let mut errors = Vec::new();
    let oversized = upload.len() > MAX_COVER_KILOBYTES * 1024;
    let kind = if oversized {
        ImageKind::guess(&upload.bytes)
    } else {
        ImageKind::detect(&upload.bytes)
    };
    if kind.is_none() {
        errors.push(FieldError::new(
            "cover",
            "The cover field must be an image of type: jpeg, png, jpg, webp.",
        ));
    }
    if oversized {
        errors.push(FieldError::new(
            "cover",
            format!(
                "The cover field must not be greater than {} kilobytes.",
                MAX_COVER_KILOBYTES
            ),
        ));
    }

    match kind {
        Some(kind) if errors.is_empty() => Ok(kind),
        _ => Err(DbError::Validation { errors }),
    }
}

/// Require a non-empty caller identity.
pub fn validate_user(user_id: &str) -> DbResult<()> {
    if user_id.trim().is_empty() {
        return Err(DbError::validation("user_id", "A user is required."));
    }
    Ok(())
}
