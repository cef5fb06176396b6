//! Input validation rules shared by the store and the engine.

use diagramhub_core::{AppError, AppResult, ItemId};

/// Maximum length of an item name, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum size of a file's content, in bytes.
pub const MAX_CONTENT_BYTES: usize = 1_000_000;

/// Validate a name and return it trimmed.
pub fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate file content size.
pub fn validate_content(content: &str) -> AppResult<()> {
    if content.len() > MAX_CONTENT_BYTES {
        return Err(AppError::validation(format!(
            "Content cannot exceed {MAX_CONTENT_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Validate the shape of an item id.
pub fn validate_id(id: &ItemId) -> AppResult<()> {
    let raw = id.as_str();
    if raw.is_empty() || raw.contains('/') || raw.chars().any(char::is_whitespace) {
        return Err(AppError::validation(format!("Malformed item id '{raw}'")));
    }
    Ok(())
}

/// Give `name` exactly one trailing `extension`.
///
/// An existing suffix is matched case-insensitively and replaced.
pub fn ensure_extension(name: &str, extension: &str) -> String {
    let base = strip_extension(name, extension);
    format!("{base}{extension}")
}

/// Remove a trailing `extension` (case-insensitive) if present.
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    if extension.is_empty() || name.len() < extension.len() {
        return name;
    }
    let split = name.len() - extension.len();
    match (name.get(..split), name.get(split..)) {
        (Some(base), Some(tail)) if tail.eq_ignore_ascii_case(extension) => base,
        _ => name,
    }
}
