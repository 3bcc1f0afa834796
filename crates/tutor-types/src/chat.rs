//! Conversation types for the tutor chat.
//!
//! A conversation is an ordered `Vec<ChatMessage>` owned by the caller.
//! Insertion order is chronological order; the tutor pipeline never
//! reorders or persists it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who said a message in a tutoring conversation.
///
/// Also accepts the generic chat-completion names (`user`, `assistant`) on
/// input so histories captured from the web client deserialize unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    #[serde(alias = "user")]
    Student,
    #[serde(alias = "assistant")]
    Tutor,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Student => write!(f, "student"),
            Speaker::Tutor => write!(f, "tutor"),
        }
    }
}

impl FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" | "user" => Ok(Speaker::Student),
            "tutor" | "assistant" => Ok(Speaker::Tutor),
            other => Err(format!("invalid speaker: '{other}'")),
        }
    }
}

/// A single turn of a tutoring conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Speaker,
    pub content: String,
}

impl ChatMessage {
    pub fn student(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Student,
            content: content.into(),
        }
    }

    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Tutor,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_roundtrip() {
        for speaker in [Speaker::Student, Speaker::Tutor] {
            let parsed: Speaker = speaker.to_string().parse().unwrap();
            assert_eq!(speaker, parsed);
        }
    }

    #[test]
    fn test_speaker_accepts_completion_role_names() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"user","content":"ما هو ٢+٢"}"#).unwrap();
        assert_eq!(msg.role, Speaker::Student);

        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"فكر معي"}"#).unwrap();
        assert_eq!(msg.role, Speaker::Tutor);
    }

    #[test]
    fn test_speaker_serializes_domain_name() {
        let json = serde_json::to_string(&ChatMessage::tutor("أحسنت")).unwrap();
        assert!(json.contains(r#""role":"tutor""#));
    }

    #[test]
    fn test_invalid_speaker() {
        assert!("teacher_bot".parse::<Speaker>().is_err());
    }
}
