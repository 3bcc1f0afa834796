//! OpenAI-compatible LLM gateway.
//!
//! Talks to any server exposing `POST {base_url}/chat/completions` (OpenAI,
//! Azure-style proxies, local model servers). Text prompts are sent as a
//! single user message; image analysis sends a text part plus a base64
//! `data:` URL image part.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed when
//! building the `Authorization` header.

pub mod types;

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, debug, info_span};

use tutor_core::llm::gateway::LlmGateway;
use tutor_types::config::GatewaySettings;
use tutor_types::llm::{GatewayError, ImageInput};

use self::types::{
    ChatCompletionRequest, ChatCompletionResponse, ContentPart, ImageUrl, MessageContent,
    RequestMessage,
};

/// Gateway for OpenAI-compatible chat completion APIs.
///
/// Does NOT derive Debug so the key never ends up in logs.
pub struct OpenAiCompatGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatGateway {
    pub fn new(settings: &GatewaySettings, api_key: SecretString) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GatewayError::UpstreamError(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request(&self, content: MessageContent) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![RequestMessage {
                role: "user",
                content,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    async fn send(&self, body: &ChatCompletionRequest) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after_ms, &error_body));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::MalformedResponse(format!("failed to parse response: {e}"))
            }
        })?;

        if let Some(usage) = &completion.usage {
            debug!(
                gen_ai.response.id = completion.id.as_deref().unwrap_or_default(),
                gen_ai.usage.input_tokens = usage.prompt_tokens,
                gen_ai.usage.output_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        extract_text(completion)
    }
}

impl LlmGateway for OpenAiCompatGateway {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = self.request(MessageContent::Text(prompt.to_string()));
        let span = info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = "openai_compatible",
            gen_ai.request.model = %self.model,
            gen_ai.request.max_tokens = self.max_tokens,
            gen_ai.request.temperature = self.temperature,
        );
        self.send(&body).instrument(span).await
    }

    async fn analyze_image(
        &self,
        image: &ImageInput,
        instructions: &str,
    ) -> Result<String, GatewayError> {
        let body = self.request(MessageContent::Parts(vec![
            ContentPart::Text {
                text: instructions.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: data_url(image),
                },
            },
        ]));
        let span = info_span!(
            "vision",
            gen_ai.operation.name = "vision",
            gen_ai.provider.name = "openai_compatible",
            gen_ai.request.model = %self.model,
            image.media_type = %image.media_type,
            image.bytes = image.data.len(),
        );
        self.send(&body).instrument(span).await
    }
}

/// `data:` URL carrying the image bytes inline.
fn data_url(image: &ImageInput) -> String {
    format!("data:{};base64,{}", image.media_type, STANDARD.encode(&image.data))
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::UpstreamError(format!("HTTP request failed: {e}"))
    }
}

fn status_error(status: StatusCode, retry_after_ms: Option<u64>, body: &str) -> GatewayError {
    match status.as_u16() {
        401 | 403 => GatewayError::AuthError,
        429 => GatewayError::RateLimited { retry_after_ms },
        408 | 504 => GatewayError::Timeout,
        _ => GatewayError::UpstreamError(format!("HTTP {status}: {body}")),
    }
}

/// `Retry-After` in whole seconds, converted to milliseconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1_000))
}

fn extract_text(completion: ChatCompletionResponse) -> Result<String, GatewayError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::MalformedResponse("response contained no choices".into()))?;

    if let Some(reason) = choice.finish_reason.as_deref() {
        debug!(gen_ai.response.finish_reasons = reason, "Completion finished");
    }

    choice
        .message
        .content
        .ok_or_else(|| GatewayError::MalformedResponse("choice has no message content".into()))
}
