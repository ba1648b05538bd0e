//! Utility functions shared by services and handlers.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Target URL validation
//! - [`password`] - Argon2id password hashing

pub mod code_generator;
pub mod password;
pub mod url_validator;
