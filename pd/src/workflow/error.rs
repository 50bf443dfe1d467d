//! Workflow errors

use thiserror::Error;

use super::Stage;
use crate::gateway::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    #[error("Cannot {action} while in the {stage} stage")]
    InvalidTransition { action: &'static str, stage: Stage },

    /// The gateway failed; `message` is what the user sees
    #[error("{message}")]
    Generation {
        message: &'static str,
        #[source]
        source: GatewayError,
    },

    #[error("A request is already in progress")]
    Busy,

    #[error("Workflow manager is not running")]
    ChannelClosed,
}

impl WorkflowError {
    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation { message, .. } => message.to_string(),
            other => other.to_string(),
        }
    }
}
