//! BoxLlmGateway -- object-safe dynamic dispatch wrapper for LlmGateway.
//!
//! 1. Define an object-safe `LlmGatewayDyn` trait with boxed futures
//! 2. Blanket-impl `LlmGatewayDyn` for all `T: LlmGateway`
//! 3. `BoxLlmGateway` wraps `Box<dyn LlmGatewayDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use tutor_types::llm::{GatewayError, ImageInput};

use super::gateway::LlmGateway;

/// Object-safe version of [`LlmGateway`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn LlmGatewayDyn`).
/// A blanket implementation is provided for all types implementing `LlmGateway`.
pub trait LlmGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;

    fn analyze_image_boxed<'a>(
        &'a self,
        image: &'a ImageInput,
        instructions: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;
}

impl<T: LlmGateway> LlmGatewayDyn for T {
    fn name(&self) -> &str {
        LlmGateway::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>> {
        Box::pin(self.generate(prompt))
    }

    fn analyze_image_boxed<'a>(
        &'a self,
        image: &'a ImageInput,
        instructions: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>> {
        Box::pin(self.analyze_image(image, instructions))
    }
}

/// Type-erased LLM gateway for runtime backend selection.
///
/// Since `LlmGateway` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxLlmGateway` provides equivalent methods that delegate to
/// the inner `LlmGatewayDyn` trait object.
pub struct BoxLlmGateway {
    inner: Box<dyn LlmGatewayDyn + Send + Sync>,
}

impl BoxLlmGateway {
    /// Wrap a concrete `LlmGateway` in a type-erased box.
    pub fn new<T: LlmGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.inner.generate_boxed(prompt).await
    }

    pub async fn analyze_image(
        &self,
        image: &ImageInput,
        instructions: &str,
    ) -> Result<String, GatewayError> {
        self.inner.analyze_image_boxed(image, instructions).await
    }
}

// BoxLlmGateway is itself a gateway so wrappers like `RetryingGateway` can
// sit on top of an already type-erased backend.
impl LlmGateway for BoxLlmGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.inner.generate_boxed(prompt).await
    }

    async fn analyze_image(
        &self,
        image: &ImageInput,
        instructions: &str,
    ) -> Result<String, GatewayError> {
        self.inner.analyze_image_boxed(image, instructions).await
    }
}
