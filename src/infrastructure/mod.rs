//! Infrastructure layer for external integrations.
//!
//! Implements the repository interfaces defined by the domain layer on top of
//! PostgreSQL.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations and migrations

pub mod persistence;
