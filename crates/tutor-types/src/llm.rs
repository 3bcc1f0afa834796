//! LLM gateway types for the tutor.
//!
//! The gateway accepts a fully assembled prompt and returns generated text.
//! These types model its failure modes, image payloads and backend kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from LLM gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthError,

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Whether a later identical request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Timeout
                | GatewayError::RateLimited { .. }
                | GatewayError::UpstreamError(_)
        )
    }
}

/// Encoded image handed to a vision-capable gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// MIME type, e.g. `image/png`.
    pub media_type: String,
    /// Raw encoded bytes (PNG/JPEG/...), not base64.
    pub data: Vec<u8>,
}

impl ImageInput {
    pub const SUPPORTED_MEDIA_TYPES: [&'static str; 4] =
        ["image/png", "image/jpeg", "image/webp", "image/gif"];

    pub fn new(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED_MEDIA_TYPES.contains(&self.media_type.as_str())
    }

    /// Guess the media type from a file extension.
    pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "webp" => Some("image/webp"),
            "gif" => Some("image/gif"),
            _ => None,
        }
    }
}

// Image bytes are noisy in logs; print only the shape.
impl fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInput")
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Which gateway backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    Offline,
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayKind::OpenAiCompatible => write!(f, "openai_compatible"),
            GatewayKind::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for GatewayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai_compatible" => Ok(GatewayKind::OpenAiCompatible),
            "offline" => Ok(GatewayKind::Offline),
            other => Err(format!("invalid gateway kind: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::UpstreamError("HTTP 503: overloaded".to_string());
        assert_eq!(err.to_string(), "upstream error: HTTP 503: overloaded");

        let err = GatewayError::RateLimited {
            retry_after_ms: Some(2000),
        };
        assert!(err.to_string().contains("2000"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(GatewayError::Timeout.is_transient());
        assert!(GatewayError::RateLimited { retry_after_ms: None }.is_transient());
        assert!(GatewayError::UpstreamError("x".into()).is_transient());
        assert!(!GatewayError::AuthError.is_transient());
        assert!(!GatewayError::MalformedResponse("x".into()).is_transient());
    }

    #[test]
    fn test_image_media_types() {
        assert!(ImageInput::new("image/png", vec![1]).is_supported());
        assert!(!ImageInput::new("application/pdf", vec![1]).is_supported());
        assert_eq!(ImageInput::media_type_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(ImageInput::media_type_for_extension("bmp"), None);
    }

    #[test]
    fn test_image_debug_hides_bytes() {
        let image = ImageInput::new("image/png", vec![0u8; 1024]);
        let debug = format!("{image:?}");
        assert!(debug.contains("1024"));
        assert!(!debug.contains("[0, 0"));
    }

    #[test]
    fn test_gateway_kind_roundtrip() {
        for kind in [GatewayKind::OpenAiCompatible, GatewayKind::Offline] {
            let parsed: GatewayKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
