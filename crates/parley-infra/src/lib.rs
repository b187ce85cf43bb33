//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! in-memory and SQLite conversation stores, the SQLite user store, the
//! Gemini LLM client, Argon2 password hashing, JWT access tokens, and the
//! TOML config loader.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod memory;
pub mod sqlite;
