//! DTOs for per-user statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortenedUrl;

/// One of the caller's links with its click count.
#[derive(Debug, Serialize)]
pub struct UrlStatsItem {
    pub original_url: String,
    pub short_code: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenedUrl> for UrlStatsItem {
    fn from(link: ShortenedUrl) -> Self {
        Self {
            original_url: link.original_url,
            short_code: link.short_code,
            click_count: link.click_count,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}
