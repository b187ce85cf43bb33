//! Registration, login, and bearer-token verification.
//!
//! The hashing and signing primitives sit behind `PasswordHasher` and
//! `TokenIssuer`; their adapters (Argon2, JWT) live in parley-infra.

pub mod password;
pub mod repository;
pub mod service;
pub mod token;
