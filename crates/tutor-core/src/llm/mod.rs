//! LLM gateway abstractions.
//!
//! - `LlmGateway`: RPITIT trait for concrete gateway backends
//! - `BoxLlmGateway`: object-safe wrapper for dynamic dispatch
//! - `RetryingGateway`: opt-in retry of transient gateway failures

pub mod box_gateway;
pub mod gateway;
pub mod retry;
