//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortenedUrl`] - A short code mapped to its original URL
//! - [`User`] - A registered account
//!
//! Creation inputs live next to their entity (`NewShortenedUrl`, `NewUser`)
//! and carry only the fields the caller supplies; ids, timestamps and
//! counters are assigned by the store.

pub mod shortened_url;
pub mod user;

pub use shortened_url::{NewShortenedUrl, ShortenedUrl};
pub use user::{NewUser, User};
