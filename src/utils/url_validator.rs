//! Target URL validation.
//!
//! The stored `original_url` is kept as submitted when it is plain visible
//! ASCII. Anything else is stored in its parsed serialisation so that it can
//! always be sent back in a `Location` header.

use url::Url;

/// Upper bound on the length of a stored target URL.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("URL contains whitespace or control characters")]
    InvalidCharacter,
}

/// Checks that `input` is an absolute `http` or `https` URL with a host and
/// returns the parsed form.
///
/// Rejects schemes such as `javascript:`, `data:` or `file:` that must never
/// be served as a redirect target. Embedded whitespace and control characters
/// are rejected instead of being silently stripped by the parser.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("javascript:alert(1)").is_err());
/// assert!(validate_url("https://example.com/a\nb").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(UrlValidationError::InvalidCharacter);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Returns the value to store for a validated URL.
///
/// Visible ASCII input is kept verbatim. Other input (an IDN host, unencoded
/// path characters) is replaced by the parser's punycode and percent-encoded
/// serialisation.
pub fn storable_form(input: &str, parsed: &Url) -> String {
    if input.bytes().all(|b| b.is_ascii_graphic()) {
        input.to_string()
    } else {
        parsed.as_str().to_string()
    }
}
