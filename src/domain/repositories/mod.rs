//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mocks are generated with `mockall`
//! for service unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Shortened URL storage and click counting
//! - [`UserRepository`] - User credential store
//! - [`TokenRepository`] - Bearer token storage and revocation

pub mod link_repository;
pub mod token_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, TokenRepository};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
