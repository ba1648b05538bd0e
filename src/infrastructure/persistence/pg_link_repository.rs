//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for shortened URLs.
///
/// Uses SQLx prepared statements for SQL injection protection and type safety.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    user_id: Option<i64>,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
}

impl From<LinkRow> for ShortenedUrl {
    fn from(r: LinkRow) -> Self {
        ShortenedUrl {
            id: r.id,
            user_id: r.user_id,
            original_url: r.original_url,
            short_code: r.short_code,
            created_at: r.created_at,
            expires_at: r.expires_at,
            click_count: r.click_count,
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortenedUrl) -> Result<ShortenedUrl, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO shortened_urls (user_id, original_url, short_code, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, original_url, short_code, created_at, expires_at, click_count
            "#,
        )
        .bind(new_link.user_id)
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, original_url, short_code, created_at, expires_at, click_count
            FROM shortened_urls
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn record_click(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortenedUrl>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE shortened_urls
            SET click_count = click_count + 1
            WHERE short_code = $1
              AND (expires_at IS NULL OR expires_at >= $2)
            RETURNING id, user_id, original_url, short_code, created_at, expires_at, click_count
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<ShortenedUrl>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, original_url, short_code, created_at, expires_at, click_count
            FROM shortened_urls
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
