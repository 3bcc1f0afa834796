//! LlmGateway trait definition.
//!
//! The narrow interface the tutor uses to reach a language model: a fully
//! assembled prompt goes in, generated text or a typed failure comes out.

use tutor_types::llm::{GatewayError, ImageInput};

/// Trait for LLM gateway backends (OpenAI-compatible HTTP, offline stub, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in tutor-infra.
pub trait LlmGateway: Send + Sync {
    /// Human-readable backend name (e.g., "openai_compatible").
    fn name(&self) -> &str;

    /// Generate a reply for an assembled prompt.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;

    /// Ask a vision-capable model to read `image` following `instructions`.
    fn analyze_image(
        &self,
        image: &ImageInput,
        instructions: &str,
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
