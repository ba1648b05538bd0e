//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod stats_service;

pub use auth_service::{AuthService, AuthUser};
pub use link_service::{LinkService, ShortenInput};
pub use stats_service::StatsService;
