//! DTOs for registration, login and token endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Allowed username characters: letters, digits and `@.+_-`.
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@.+_-]+$").expect("valid username regex"));

/// Username and password body shared by register, login and api-token-auth.
///
/// Missing fields deserialize as empty strings and fail the length checks.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    #[validate(regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits and @.+_-"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub token: String,
}

/// Response carrying a freshly issued token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_credentials() {
        assert!(creds("alice", "pw").validate().is_ok());
        assert!(creds("a.b+c@d_e-f", "pw").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let req: CredentialsRequest = serde_json::from_str("{}").unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_username_charset() {
        assert!(creds("has space", "pw").validate().is_err());
        assert!(creds("semi;colon", "pw").validate().is_err());
    }

    #[test]
    fn test_username_length() {
        assert!(creds(&"a".repeat(150), "pw").validate().is_ok());
        assert!(creds(&"a".repeat(151), "pw").validate().is_err());
    }
}
