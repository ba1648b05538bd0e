//! Shortened URL entity: the mapping from a short code to its target.

use chrono::{DateTime, Utc};

/// A stored short code with its target URL and usage counters.
///
/// `user_id` is `None` for links created anonymously.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenedUrl {
    pub id: i64,
    pub user_id: Option<i64>,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl ShortenedUrl {
    /// Returns true once `now` is strictly past `expires_at`.
    ///
    /// Links without an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }
}

/// Input data for creating a new shortened URL.
///
/// `created_at` and `click_count` are assigned by the database.
#[derive(Debug, Clone)]
pub struct NewShortenedUrl {
    pub user_id: Option<i64>,
    pub original_url: String,
    pub short_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> ShortenedUrl {
        ShortenedUrl {
            id: 1,
            user_id: None,
            original_url: "https://example.com".to_string(),
            short_code: "ab3F9k".to_string(),
            created_at: Utc::now(),
            expires_at,
            click_count: 0,
        }
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link = link(None);
        assert!(!link.is_expired_at(Utc::now()));
        assert!(!link.is_expired_at(Utc::now() + Duration::days(10_000)));
    }

    #[test]
    fn test_link_expired_in_the_past() {
        let link = link(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_link_expiring_in_the_future() {
        let link = link(Some(Utc::now() + Duration::days(1)));
        assert!(!link.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_link_at_exact_expiry_is_still_valid() {
        let at = Utc::now();
        let link = link(Some(at));
        assert!(!link.is_expired_at(at));
        assert!(link.is_expired_at(at + Duration::milliseconds(1)));
    }
}
