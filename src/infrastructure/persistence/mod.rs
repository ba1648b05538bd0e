//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//! Each repository holds an explicit shared pool handle.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Shortened URL storage and atomic click counting
//! - [`PgUserRepository`] - User credential store
//! - [`PgTokenRepository`] - Bearer token storage and revocation

pub mod pg_link_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;

/// Embedded, versioned schema migrations from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
