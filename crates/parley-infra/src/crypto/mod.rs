//! Cryptographic adapters for Parley.
//!
//! - `password`: Argon2id password hashing
//! - `token`: HS256 JWT access tokens

pub mod password;
pub mod token;
