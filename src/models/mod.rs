pub mod answer;
pub mod organisation;
pub mod presentation;
pub mod question;
pub mod scope;
pub mod slide;
pub mod user_answer;

use crate::errors::AppError;

/// Column width of organisation and presentation names.
pub const MAX_NAME_LENGTH: usize = 64;

/// Trim a display name and check it fits its column. `kind` names the record
/// in the error message.
pub(crate) fn validate_name<'a>(kind: &str, name: &'a str) -> Result<&'a str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{kind} name is required")));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{kind} name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name)
}
