//! HTTP layer for Parley.
//!
//! Two axum routers share handlers where they can: the ephemeral one for
//! anonymous in-memory sessions and the persistent one with registration,
//! bearer tokens, and SQLite-backed conversations.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
