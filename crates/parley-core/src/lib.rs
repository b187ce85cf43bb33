//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (repository, provider, hasher, and token
//! traits) that the infrastructure layer implements, plus the services that
//! drive them. It depends only on `parley-types` -- never on `parley-infra`
//! or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
