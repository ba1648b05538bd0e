//! Per-user usage statistics service.

use std::sync::Arc;

use crate::domain::entities::ShortenedUrl;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service for listing a user's links with their click counts.
pub struct StatsService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> StatsService<L> {
    /// Creates a new statistics service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Returns every link owned by `user_id`, oldest first.
    ///
    /// Anonymous links and other users' links are never included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn user_stats(&self, user_id: i64) -> Result<Vec<ShortenedUrl>, AppError> {
        self.link_repository.list_by_owner(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn owned_link(id: i64, user_id: i64, clicks: i64) -> ShortenedUrl {
        ShortenedUrl {
            id,
            user_id: Some(user_id),
            original_url: format!("https://example.com/{id}"),
            short_code: format!("code{id}"),
            created_at: Utc::now(),
            expires_at: None,
            click_count: clicks,
        }
    }

    #[tokio::test]
    async fn test_user_stats_returns_owned_links() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_list_by_owner()
            .withf(|user_id| *user_id == 4)
            .times(1)
            .returning(|user_id| Ok(vec![owned_link(1, user_id, 3), owned_link(2, user_id, 0)]));

        let service = StatsService::new(Arc::new(mock_repo));
        let links = service.user_stats(4).await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].click_count, 3);
        assert!(links.iter().all(|l| l.user_id == Some(4)));
    }

    #[tokio::test]
    async fn test_user_stats_empty() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_list_by_owner().returning(|_| Ok(vec![]));

        let service = StatsService::new(Arc::new(mock_repo));

        assert!(service.user_stats(1).await.unwrap().is_empty());
    }
}
