//! Workshop workflow
//!
//! The orchestrator drives the clarify -> plan pipeline and owns the stage
//! machine. The manager runs one orchestrator in an actor task and hands out
//! cloneable handles. Which pipeline runs is decided by a strategy.
//!
//! ```text
//! Input -> Generating(Questions) -> Questions -> Generating(Plan) -> Result
//!                 \____________ no questions ___________/
//! ```

mod error;
mod manager;
mod messages;
mod orchestrator;
mod strategy;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{ProductConcept, WorkshopStep};

pub use error::WorkflowError;
pub use manager::WorkflowManager;
pub use messages::{BusyGuard, WorkflowCommand, WorkflowResponse};
pub use orchestrator::{CHAPTER_HELP_FALLBACK, CHAT_FALLBACK, Orchestrator, WorkflowSnapshot};
pub use strategy::{CONCEPT_INCOMPLETE_MESSAGE, ConceptStrategy, GuidedStrategy, WorkflowStrategy};

/// Which workshop flow runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowVariant {
    /// Free-text goal, clarifying questions, action steps
    #[default]
    Guided,
    /// Four-chapter concept form, chapter steps
    Concept,
}

impl WorkflowVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guided => "guided",
            Self::Concept => "concept",
        }
    }

    pub fn strategy(&self) -> Arc<dyn WorkflowStrategy> {
        match self {
            Self::Guided => Arc::new(GuidedStrategy),
            Self::Concept => Arc::new(ConceptStrategy),
        }
    }
}

impl fmt::Display for WorkflowVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guided" => Ok(Self::Guided),
            "concept" => Ok(Self::Concept),
            other => Err(format!("Unknown workshop variant '{}'. Expected guided or concept", other)),
        }
    }
}

/// What a generating stage is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pending {
    Questions,
    Plan,
}

/// Where the workshop is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Input,
    Generating(Pending),
    Questions,
    Result,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Generating(Pending::Questions) => "generating-questions",
            Self::Generating(Pending::Plan) => "generating-plan",
            Self::Questions => "questions",
            Self::Result => "result",
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the user submitted to start a workshop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowInput {
    Goal(String),
    Concept(ProductConcept),
}

/// A finished plan: ordered steps plus a one-sentence summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResult {
    pub steps: Vec<WorkshopStep>,
    pub summary: String,
}
