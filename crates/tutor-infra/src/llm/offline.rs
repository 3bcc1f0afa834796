//! Offline gateway for development without an API key.

use tutor_core::llm::gateway::LlmGateway;
use tutor_types::llm::{GatewayError, ImageInput};

/// Fixed reply returned for every text prompt.
pub const OFFLINE_REPLY: &str = "هذه إجابة تجريبية. سيتم تفعيل الذكاء الاصطناعي قريبًا.";

/// Image analysis reply: valid analysis JSON with an `unknown` problem type.
pub const OFFLINE_ANALYSIS: &str = r#"{"problem_text":"تحليل الصور غير مفعّل في الوضع التجريبي","equations":[],"problem_type":"unknown","given":[],"required":""}"#;

/// Answers every request locally with a canned reply.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

impl LlmGateway for OfflineGateway {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
        Ok(OFFLINE_REPLY.to_string())
    }

    async fn analyze_image(
        &self,
        _image: &ImageInput,
        _instructions: &str,
    ) -> Result<String, GatewayError> {
        Ok(OFFLINE_ANALYSIS.to_string())
    }
}
