//! Shared domain types for the Smart Teacher AI tutor.
//!
//! This crate contains the types passed between the tutor pipeline, its
//! external collaborators (content store, LLM gateway) and the API layer:
//! chat messages, curriculum content, the `Outcome` result wrapper, and the
//! error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod analysis;
pub mod chat;
pub mod config;
pub mod content;
pub mod entity;
pub mod error;
pub mod llm;
pub mod outcome;
