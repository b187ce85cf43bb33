//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley
//! workspace: conversations, chat turns, users, access-token claims, LLM
//! request shapes, server configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod user;
