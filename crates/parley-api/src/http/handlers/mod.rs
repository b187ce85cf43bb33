//! HTTP request handlers.

pub mod auth;
pub mod chat;
pub mod conversation;
pub mod history;
pub mod session;

use uuid::Uuid;

/// Parse a session id from a path or body. `None` for anything that is not
/// a UUID, which callers report the same way as an unknown session.
pub(crate) fn parse_session_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
