//! Parley application layer: HTTP routers, handlers, and service wiring.
//!
//! The `parley` binary in `main.rs` parses the CLI and serves one of the
//! two routers; integration tests drive the same routers in-process.

pub mod http;
pub mod state;
