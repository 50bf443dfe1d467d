//! Workshop strategies
//!
//! A strategy decides how input is validated, whether clarifying questions
//! are asked and how the plan is built. The orchestrator owns the stages.

use async_trait::async_trait;
use tracing::debug;

use super::{PlanResult, WorkflowError, WorkflowInput};
use crate::domain::{ClarifyingQuestions, WorkshopStep};
use crate::gateway::{Gateway, GatewayError};

#[async_trait]
pub trait WorkflowStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reject input that must never reach the gateway
    fn validate(&self, input: &WorkflowInput) -> Result<(), WorkflowError>;

    /// Whether chapter hints are offered while filling the form
    fn offers_chapter_help(&self) -> bool {
        false
    }

    /// Questions to ask before planning; empty means plan right away
    async fn clarify(&self, gateway: &Gateway, input: &WorkflowInput) -> Result<ClarifyingQuestions, GatewayError>;

    /// Build the plan from the input and the folded answers
    async fn plan(&self, gateway: &Gateway, input: &WorkflowInput, answers: &str) -> Result<PlanResult, GatewayError>;
}

/// Free-text goal, up to four clarifying questions, then action steps
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidedStrategy;

impl GuidedStrategy {
    fn goal(input: &WorkflowInput) -> Result<&str, WorkflowError> {
        match input {
            WorkflowInput::Goal(goal) if !goal.trim().is_empty() => Ok(goal.trim()),
            WorkflowInput::Goal(_) => Err(WorkflowError::Validation(
                "Please describe your goal or current situation first.".to_string(),
            )),
            WorkflowInput::Concept(_) => Err(WorkflowError::Validation(
                "The guided workshop starts from a goal, not a product concept.".to_string(),
            )),
        }
    }
}

#[async_trait]
impl WorkflowStrategy for GuidedStrategy {
    fn name(&self) -> &'static str {
        "guided"
    }

    fn validate(&self, input: &WorkflowInput) -> Result<(), WorkflowError> {
        Self::goal(input).map(|_| ())
    }

    async fn clarify(&self, gateway: &Gateway, input: &WorkflowInput) -> Result<ClarifyingQuestions, GatewayError> {
        debug!("GuidedStrategy::clarify: called");
        match Self::goal(input) {
            Ok(goal) => gateway.clarifying_questions(goal).await,
            Err(_) => Ok(ClarifyingQuestions::default()),
        }
    }

    async fn plan(&self, gateway: &Gateway, input: &WorkflowInput, answers: &str) -> Result<PlanResult, GatewayError> {
        debug!(answers_len = answers.len(), "GuidedStrategy::plan: called");
        let goal = Self::goal(input).map_err(|e| GatewayError::Template(e.to_string()))?;

        // Summary is written from the finished plan, so these run in sequence
        let steps = gateway.final_workflow(goal, answers).await?;
        if steps.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        let summary = gateway.plain_summary(&steps).await?;

        Ok(PlanResult {
            steps: steps.into_iter().map(WorkshopStep::from).collect(),
            summary,
        })
    }
}

/// Shown when a concept is submitted without a name or problem
pub const CONCEPT_INCOMPLETE_MESSAGE: &str = "Please provide a project name and describe the problem you are solving.";

/// Four-chapter product concept, no questions, chapter steps
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptStrategy;

#[async_trait]
impl WorkflowStrategy for ConceptStrategy {
    fn name(&self) -> &'static str {
        "concept"
    }

    fn validate(&self, input: &WorkflowInput) -> Result<(), WorkflowError> {
        match input {
            WorkflowInput::Concept(concept) if concept.is_submittable() => Ok(()),
            WorkflowInput::Concept(_) => Err(WorkflowError::Validation(
                CONCEPT_INCOMPLETE_MESSAGE.to_string(),
            )),
            WorkflowInput::Goal(_) => Err(WorkflowError::Validation(
                "The concept workshop starts from a product concept, not a goal.".to_string(),
            )),
        }
    }

    fn offers_chapter_help(&self) -> bool {
        true
    }

    async fn clarify(&self, _gateway: &Gateway, _input: &WorkflowInput) -> Result<ClarifyingQuestions, GatewayError> {
        debug!("ConceptStrategy::clarify: no questions for concepts");
        Ok(ClarifyingQuestions::default())
    }

    async fn plan(&self, gateway: &Gateway, input: &WorkflowInput, _answers: &str) -> Result<PlanResult, GatewayError> {
        debug!("ConceptStrategy::plan: called");
        let WorkflowInput::Concept(concept) = input else {
            return Err(GatewayError::Template("concept workshop needs a concept".to_string()));
        };

        let (steps, summary) = futures::try_join!(gateway.concept_workshop(concept), gateway.concept_summary(concept))?;
        if steps.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(PlanResult {
            steps: steps.into_iter().map(WorkshopStep::from).collect(),
            summary,
        })
    }
}
