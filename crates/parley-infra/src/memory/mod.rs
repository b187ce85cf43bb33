//! Process-local storage for the ephemeral deployment.
//!
//! Everything here is lost on restart.

pub mod conversation;
