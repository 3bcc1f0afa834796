//! LLM gateway implementations.
//!
//! Concrete [`LlmGateway`](tutor_core::llm::gateway::LlmGateway) backends
//! plus a factory ([`create_gateway`]) that picks one from `[gateway]`
//! settings.

pub mod offline;
pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use tutor_core::llm::box_gateway::BoxLlmGateway;
use tutor_core::llm::retry::{RetryPolicy, RetryingGateway};
use tutor_types::config::GatewaySettings;
use tutor_types::llm::{GatewayError, GatewayKind};

use self::offline::OfflineGateway;
use self::openai_compat::OpenAiCompatGateway;

/// Create a [`BoxLlmGateway`] from `[gateway]` settings.
///
/// The OpenAI-compatible backend needs `api_key` and fails with
/// `AuthError` without one. When `max_attempts > 1` the backend is wrapped
/// in a [`RetryingGateway`].
pub fn create_gateway(
    settings: &GatewaySettings,
    api_key: Option<SecretString>,
) -> Result<BoxLlmGateway, GatewayError> {
    let gateway = match settings.kind {
        GatewayKind::Offline => BoxLlmGateway::new(OfflineGateway),
        GatewayKind::OpenAiCompatible => {
            let key = api_key.ok_or(GatewayError::AuthError)?;
            BoxLlmGateway::new(OpenAiCompatGateway::new(settings, key)?)
        }
    };

    if settings.max_attempts > 1 {
        let policy = RetryPolicy::new(
            settings.max_attempts,
            Duration::from_millis(settings.retry_base_delay_ms),
        );
        tracing::debug!(
            gateway = gateway.name(),
            max_attempts = policy.max_attempts,
            "Wrapping gateway with retry policy"
        );
        return Ok(BoxLlmGateway::new(RetryingGateway::new(gateway, policy)));
    }

    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::llm::gateway::LlmGateway;

    #[test]
    fn test_offline_needs_no_key() {
        let gateway = create_gateway(&GatewaySettings::default(), None).unwrap();
        assert_eq!(gateway.name(), "offline");
    }

    #[test]
    fn test_openai_without_key_is_auth_error() {
        let settings = GatewaySettings {
            kind: GatewayKind::OpenAiCompatible,
            ..GatewaySettings::default()
        };
        assert!(matches!(
            create_gateway(&settings, None),
            Err(GatewayError::AuthError)
        ));
    }

    #[test]
    fn test_openai_with_key() {
        let settings = GatewaySettings {
            kind: GatewayKind::OpenAiCompatible,
            ..GatewaySettings::default()
        };
        let key = SecretString::from("sk-test".to_string());
        let gateway = create_gateway(&settings, Some(key)).unwrap();
        assert_eq!(gateway.name(), "openai_compatible");
    }

    #[tokio::test]
    async fn test_retry_wrapper_keeps_backend_name() {
        let settings = GatewaySettings {
            max_attempts: 3,
            ..GatewaySettings::default()
        };
        let gateway = create_gateway(&settings, None).unwrap();
        assert_eq!(LlmGateway::name(&gateway), "offline");
        assert!(!gateway.generate("x").await.unwrap().is_empty());
    }
}
