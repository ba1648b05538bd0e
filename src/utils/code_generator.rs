//! Short code generation and validation utilities.
//!
//! Generated codes are not checked for uniqueness up front; the unique
//! constraint on `shortened_urls.short_code` is the single source of truth.

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use serde_json::json;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Maximum length of any stored short code.
pub const MAX_CODE_LENGTH: usize = 15;

/// Reserved codes that cannot be used as short links.
///
/// Codes live under `/s/{code}`, so none of these can shadow a route. They are
/// refused so that a shared link such as `/s/login` is never mistaken for the
/// service's own endpoint, and so that the redirect can later be mounted at
/// the root without migrating existing codes.
const RESERVED_CODES: &[&str] = &[
    "s",
    "shorten",
    "register",
    "login",
    "logout",
    "stats",
    "health",
    "api-token-auth",
];

/// Generates a random 6-character code from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 1-15 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 1-15 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
