//! Gateway error types

use thiserror::Error;

use crate::llm::LlmError;
use crate::prompts::PromptError;

pub const WORKSHOP_GENERIC_MESSAGE: &str = "I'm having trouble connecting to the system. Please try again in a moment.";
pub const WORKSHOP_SAFETY_MESSAGE: &str =
    "The AI could not answer this request because of safety filters. Please rephrase it and try again.";
pub const TRANSLATOR_GENERIC_MESSAGE: &str =
    "I'm having trouble simplifying this term right now. Please try again in a few moments.";
pub const TRANSLATOR_SAFETY_MESSAGE: &str =
    "The AI was unable to translate this specific term due to safety filters. Try another term.";

/// Which view is asking, for picking the user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Workshop,
    Translator,
}

/// Outcome of a failed generation call
///
/// Cloneable so the workflow can keep the last failure around and hand it
/// across the actor boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model returned malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Blocked by safety filters: {0}")]
    SafetyBlocked(String),

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Prompt template error: {0}")]
    Template(String),
}

impl GatewayError {
    /// Short tag for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyResponse => "empty-response",
            Self::MalformedJson(_) => "malformed-json",
            Self::SafetyBlocked(_) => "safety-blocked",
            Self::TransportFailure(_) => "transport-failure",
            Self::Template(_) => "template",
        }
    }

    pub fn is_safety_blocked(&self) -> bool {
        matches!(self, Self::SafetyBlocked(_))
    }

    /// The single canned message shown to the user
    ///
    /// Only a safety block gets its own wording; everything else is the
    /// generic message for the surface.
    pub fn user_message(&self, surface: Surface) -> &'static str {
        match (surface, self.is_safety_blocked()) {
            (Surface::Workshop, true) => WORKSHOP_SAFETY_MESSAGE,
            (Surface::Workshop, false) => WORKSHOP_GENERIC_MESSAGE,
            (Surface::Translator, true) => TRANSLATOR_SAFETY_MESSAGE,
            (Surface::Translator, false) => TRANSLATOR_GENERIC_MESSAGE,
        }
    }
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Blocked { reason } => Self::SafetyBlocked(reason),
            other => Self::TransportFailure(other.to_string()),
        }
    }
}

impl From<PromptError> for GatewayError {
    fn from(err: PromptError) -> Self {
        Self::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_llm_error() {
        let blocked = GatewayError::from(LlmError::Blocked {
            reason: "SAFETY".to_string(),
        });
        assert_eq!(blocked, GatewayError::SafetyBlocked("SAFETY".to_string()));

        let timeout = GatewayError::from(LlmError::Timeout(Duration::from_secs(60)));
        assert!(matches!(timeout, GatewayError::TransportFailure(_)));

        let api = GatewayError::from(LlmError::ApiError {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(api.kind(), "transport-failure");
    }

    #[test]
    fn test_user_messages_differ_for_safety() {
        let safety = GatewayError::SafetyBlocked("SAFETY".to_string());
        let transport = GatewayError::TransportFailure("down".to_string());

        assert_ne!(safety.user_message(Surface::Workshop), transport.user_message(Surface::Workshop));
        assert_ne!(
            safety.user_message(Surface::Translator),
            transport.user_message(Surface::Translator)
        );
        assert!(safety.user_message(Surface::Workshop).contains("safety filters"));
    }

    #[test]
    fn test_non_safety_errors_share_generic_message() {
        for err in [
            GatewayError::EmptyResponse,
            GatewayError::MalformedJson("x".to_string()),
            GatewayError::Template("x".to_string()),
        ] {
            assert_eq!(err.user_message(Surface::Workshop), WORKSHOP_GENERIC_MESSAGE);
            assert_eq!(err.user_message(Surface::Translator), TRANSLATOR_GENERIC_MESSAGE);
        }
    }
}
