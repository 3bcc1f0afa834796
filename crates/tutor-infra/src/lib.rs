//! Infrastructure layer for the Smart Teacher AI tutor.
//!
//! Contains implementations of the port traits defined in `tutor-core`:
//! the SQLite curriculum store, LLM gateways (OpenAI-compatible HTTP and an
//! offline stub), and the `tutor.toml` configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
