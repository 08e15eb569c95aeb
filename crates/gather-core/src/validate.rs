//! Input limits applied before any write.

use crate::{Result, ServiceError};

pub const GROUP_NAME_MAX: usize = 100;
pub const TITLE_MAX: usize = 150;
pub const BOOK_MAX: usize = 120;
pub const VERSION_MAX: usize = 20;
pub const DISPLAY_NAME_MAX: usize = 100;

/// A required text field: non-blank and at most `max` characters.
pub fn required(field: &str, value: &str, max: Option<usize>) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Invalid(format!("{field} must not be empty")));
    }
    bounded(field, value, max)
}

/// An optional text field limited to `max` characters.
pub fn optional(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(value) => bounded(field, value, Some(max)),
        None => Ok(()),
    }
}

/// A field that may be absent but, when present, must satisfy [`required`].
pub fn patched(field: &str, value: Option<&str>, max: Option<usize>) -> Result<()> {
    match value {
        Some(value) => required(field, value, max),
        None => Ok(()),
    }
}

/// Trimmed display name, 1..=100 characters.
pub fn display_name(value: &str) -> Result<String> {
    let trimmed = value.trim();
    required("display_name", trimmed, Some(DISPLAY_NAME_MAX))?;
    Ok(trimmed.to_string())
}

fn bounded(field: &str, value: &str, max: Option<usize>) -> Result<()> {
    match max {
        Some(max) if value.chars().count() > max => Err(ServiceError::Invalid(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}
