//! Conversation lifecycle and chat turn handling for Parley.
//!
//! - `repository`: the `ConversationRepository` port
//! - `chain`: prompt template + provider call producing the next turns
//! - `service`: `ChatService`, the ownership-checked entry point
//! - `title`: deterministic titles for untitled conversations

pub mod chain;
pub mod repository;
pub mod service;
pub mod title;
