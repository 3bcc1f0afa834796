//! Tutor pipeline logic and port trait definitions.
//!
//! This crate defines the "ports" (content store, LLM gateway) that the
//! infrastructure layer implements, plus the pure pipeline that composes
//! them. It depends only on `tutor-types` -- never on `tutor-infra` or any
//! database/HTTP crate.

pub mod content;
pub mod llm;
pub mod tutor;
