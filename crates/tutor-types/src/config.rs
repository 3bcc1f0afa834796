//! Configuration types for the tutor.
//!
//! `AppConfig` mirrors `tutor.toml` in the data directory. Every field has a
//! default so an empty or missing file yields a working offline setup.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::llm::GatewayKind;

/// Accepted values for `tutor.max_prompt_tokens`.
pub const PROMPT_TOKENS_RANGE: RangeInclusive<u32> = 256..=1_000_000;

/// Top-level `tutor.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tutor: TutorSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Pipeline knobs: history window, retrieval bounds, labels, templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorSettings {
    /// Most recent history messages kept in the prompt.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
    /// Upper bound on retrieved snippets per call.
    #[serde(default = "default_max_snippets")]
    pub max_snippets: usize,
    /// Approximate token ceiling for the assembled prompt.
    #[serde(default = "default_max_prompt_tokens")]
    pub max_prompt_tokens: u32,
    /// Context text used when retrieval yields nothing.
    #[serde(default = "default_context_placeholder")]
    pub context_placeholder: String,
    #[serde(default = "default_student_label")]
    pub student_label: String,
    #[serde(default = "default_tutor_label")]
    pub tutor_label: String,
    /// Optional file overriding the built-in Socratic chat template.
    #[serde(default)]
    pub chat_template_path: Option<String>,
    /// Optional file overriding the built-in hint template.
    #[serde(default)]
    pub hint_template_path: Option<String>,
}

fn default_max_history_turns() -> usize {
    10
}

fn default_max_snippets() -> usize {
    5
}

fn default_max_prompt_tokens() -> u32 {
    6_000
}

fn default_context_placeholder() -> String {
    "لا يوجد محتوى متاح في الوقت الحالي".to_string()
}

fn default_student_label() -> String {
    "الطالب".to_string()
}

fn default_tutor_label() -> String {
    "المعلم".to_string()
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            max_snippets: default_max_snippets(),
            max_prompt_tokens: default_max_prompt_tokens(),
            context_placeholder: default_context_placeholder(),
            student_label: default_student_label(),
            tutor_label: default_tutor_label(),
            chat_template_path: None,
            hint_template_path: None,
        }
    }
}

/// LLM gateway selection and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_gateway_kind")]
    pub kind: GatewayKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Total attempts per generation, 1 disables retry.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_gateway_kind() -> GatewayKind {
    GatewayKind::Offline
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "TUTOR_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1_024
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

impl TutorSettings {
    /// Reject values that would leave the prompt without usable regions.
    pub fn validate(&self) -> Result<(), String> {
        if !PROMPT_TOKENS_RANGE.contains(&self.max_prompt_tokens) {
            return Err(format!(
                "max_prompt_tokens must be between {} and {}, got {}",
                PROMPT_TOKENS_RANGE.start(),
                PROMPT_TOKENS_RANGE.end(),
                self.max_prompt_tokens
            ));
        }
        if self.context_placeholder.trim().is_empty() {
            return Err("context_placeholder must not be blank".to_string());
        }
        Ok(())
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            kind: default_gateway_kind(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

/// REST server bind address and per-request deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tutor.max_history_turns, 10);
        assert_eq!(config.tutor.max_snippets, 5);
        assert_eq!(config.tutor.student_label, "الطالب");
        assert_eq!(config.gateway.kind, GatewayKind::Offline);
        assert_eq!(config.gateway.max_attempts, 1);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate_prompt_token_range() {
        assert!(TutorSettings::default().validate().is_ok());

        for bad in [0, 2, 255, 1_000_001, u32::MAX] {
            let settings = TutorSettings {
                max_prompt_tokens: bad,
                ..TutorSettings::default()
            };
            assert!(settings.validate().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_validate_rejects_blank_placeholder() {
        let settings = TutorSettings {
            context_placeholder: "  ".to_string(),
            ..TutorSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.tutor.max_prompt_tokens, 6_000);
        assert_eq!(config.gateway.model, "gpt-4o-mini");
        assert_eq!(config.server.request_timeout_secs, 60);
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml_str = r#"
[tutor]
max_history_turns = 4

[gateway]
kind = "openai_compatible"
base_url = "https://router.example.com/v1"
max_attempts = 3
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tutor.max_history_turns, 4);
        assert_eq!(config.tutor.max_snippets, 5);
        assert_eq!(config.gateway.kind, GatewayKind::OpenAiCompatible);
        assert_eq!(config.gateway.base_url, "https://router.example.com/v1");
        assert_eq!(config.gateway.max_attempts, 3);
        assert_eq!(config.gateway.timeout_secs, 60);
    }
}
