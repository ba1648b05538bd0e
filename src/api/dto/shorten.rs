//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::domain::entities::ShortenedUrl;

/// Request to shorten a URL.
///
/// Every field is optional at the wire level so that a missing
/// `original_url` produces the domain error rather than a JSON rejection.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub original_url: Option<String>,

    /// Desired code. Empty string behaves like absent.
    #[serde(default)]
    pub custom_code: Option<String>,

    /// Days until expiry; accepts `7` or `"7"`.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub expires_in_days: Option<i64>,
}

/// Created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenResponse {
    pub fn new(link: ShortenedUrl, short_url: String) -> Self {
        Self {
            short_url,
            original_url: link.original_url,
            expires_at: link.expires_at,
        }
    }
}
