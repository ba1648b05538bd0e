//! Shared application state injected into handlers and middleware.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::infrastructure::persistence::{PgLinkRepository, PgTokenRepository, PgUserRepository};

pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppAuthService = AuthService<PgUserRepository, PgTokenRepository>;
pub type AppStatsService = StatsService<PgLinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub link_service: Arc<AppLinkService>,
    pub auth_service: Arc<AppAuthService>,
    pub stats_service: Arc<AppStatsService>,
}

impl AppState {
    /// Wires PostgreSQL repositories into the services.
    ///
    /// - `base_url` - public prefix for generated short URLs
    /// - `signing_secret` - HMAC key for bearer tokens
    pub fn new(pool: Arc<PgPool>, base_url: String, signing_secret: String) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let token_repository = Arc::new(PgTokenRepository::new(pool.clone()));

        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone(), base_url)),
            auth_service: Arc::new(AuthService::new(
                user_repository,
                token_repository,
                signing_secret,
            )),
            stats_service: Arc::new(StatsService::new(link_repository)),
            db: pool,
        }
    }
}
