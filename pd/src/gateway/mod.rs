//! AI Gateway
//!
//! The one place that talks to the model. Each call renders a prompt, issues
//! exactly one `LlmClient::generate` call, and turns the reply into JSON or
//! text. Failures come back as a [`GatewayError`]; there is no retry.

mod clean;
mod error;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::domain::{
    ActionStep, Chapter, ChapterStep, ClarifyingQuestions, JargonTranslation, MAX_QUESTIONS, ProductConcept,
    WorkshopStep,
};
use crate::llm::{FinishReason, GenerateRequest, LlmClient};
use crate::prompts::{PromptKind, PromptLoader};

pub use clean::clean_json;
pub use error::{
    GatewayError, Surface, TRANSLATOR_GENERIC_MESSAGE, TRANSLATOR_SAFETY_MESSAGE, WORKSHOP_GENERIC_MESSAGE,
    WORKSHOP_SAFETY_MESSAGE,
};

/// Used when the model returns an empty summary
pub const SUMMARY_FALLBACK: &str = "A practical plan for your goal.";

/// A successful reply: parsed JSON when a schema was requested, text otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Json(Value),
    Text(String),
}

/// Limits passed into the prompt templates
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptLimits {
    pub max_questions: usize,
    pub max_steps: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_questions: MAX_QUESTIONS,
            max_steps: 5,
        }
    }
}

#[derive(Serialize)]
struct AnswerLine<'a> {
    label: &'a str,
    value: &'a str,
}

/// Boundary between the app and the remote model
pub struct Gateway {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
    limits: PromptLimits,
}

impl Gateway {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32, limits: PromptLimits) -> Self {
        debug!(model = %llm.model(), %max_tokens, ?limits, "Gateway::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
            limits,
        }
    }

    /// Issue one generation call for `kind`
    ///
    /// `payload` feeds the user prompt template. The system instruction is
    /// rendered from the kind's system templates and the configured limits.
    pub async fn generate(&self, kind: PromptKind, payload: &Value) -> Result<Generated, GatewayError> {
        debug!(%kind, "Gateway::generate: called");
        let system = self.prompts.render_all(kind.system_templates(), &self.limits)?;
        let prompt = self.prompts.render(kind.template_name(), payload)?;

        let mut request = GenerateRequest::text(system, prompt, self.max_tokens);
        if let Some(schema) = kind.schema() {
            request = request.with_schema(schema);
        }

        let response = self.llm.generate(request).await.inspect_err(|e| {
            warn!(%kind, status = ?e.status(), blocked = e.is_blocked(), error = %e, "Gateway::generate: llm call failed");
        })?;
        info!(
            %kind,
            model = %self.llm.model(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Gateway::generate: reply received"
        );

        let truncated = response.finish_reason == FinishReason::MaxTokens;
        if truncated {
            warn!(%kind, max_tokens = self.max_tokens, output_tokens = response.usage.output_tokens, "Gateway::generate: reply cut off at the token limit");
        }

        let text = response
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(GatewayError::EmptyResponse)?;

        if kind.wants_json() {
            let cleaned = clean_json(&text);
            debug!(%kind, raw_len = text.len(), cleaned_len = cleaned.len(), "Gateway::generate: parsing json");
            let value = serde_json::from_str(&cleaned).map_err(|e| {
                if truncated {
                    GatewayError::MalformedJson(format!("reply cut off at the token limit: {}", e))
                } else {
                    GatewayError::MalformedJson(e.to_string())
                }
            })?;
            Ok(Generated::Json(value))
        } else {
            Ok(Generated::Text(text.trim().to_string()))
        }
    }

    async fn generate_json<T: DeserializeOwned>(&self, kind: PromptKind, payload: &Value) -> Result<T, GatewayError> {
        match self.generate(kind, payload).await? {
            Generated::Json(value) => {
                serde_json::from_value(value).map_err(|e| GatewayError::MalformedJson(format!("{}: {}", kind, e)))
            }
            Generated::Text(_) => Err(GatewayError::MalformedJson(format!("{}: expected JSON", kind))),
        }
    }

    async fn generate_text(&self, kind: PromptKind, payload: &Value) -> Result<String, GatewayError> {
        match self.generate(kind, payload).await? {
            Generated::Text(text) => Ok(text),
            Generated::Json(value) => Ok(value.to_string()),
        }
    }

    /// Ask for up to `max_questions` clarifying questions about `context`
    pub async fn clarifying_questions(&self, context: &str) -> Result<ClarifyingQuestions, GatewayError> {
        debug!(context_len = context.len(), "clarifying_questions: called");
        let payload = json!({ "context": context, "max_questions": self.limits.max_questions });
        let questions: Vec<String> = self.generate_json(PromptKind::ClarifyingQuestions, &payload).await?;
        Ok(ClarifyingQuestions::new(questions, self.limits.max_questions))
    }

    /// Ask for the personalised action plan
    pub async fn final_workflow(&self, context: &str, answers: &str) -> Result<Vec<ActionStep>, GatewayError> {
        debug!(context_len = context.len(), answers_len = answers.len(), "final_workflow: called");
        let payload = json!({
            "context": context,
            "answers": answers,
            "max_steps": self.limits.max_steps,
        });
        self.generate_json(PromptKind::FinalWorkflow, &payload).await
    }

    /// One-sentence summary of an action plan
    pub async fn plain_summary(&self, steps: &[ActionStep]) -> Result<String, GatewayError> {
        debug!(steps = steps.len(), "plain_summary: called");
        let steps = serde_json::to_string(steps).map_err(|e| GatewayError::Template(e.to_string()))?;
        let payload = json!({ "steps": steps });
        summary_or_fallback(self.generate_text(PromptKind::PlainSummary, &payload).await)
    }

    /// Four chapter steps for a product concept
    pub async fn concept_workshop(&self, concept: &ProductConcept) -> Result<Vec<ChapterStep>, GatewayError> {
        debug!(name = %concept.name, "concept_workshop: called");
        let payload = json!({ "concept": concept, "team": concept.team_status.as_str() });
        self.generate_json(PromptKind::ConceptWorkshop, &payload).await
    }

    /// One-sentence description of a product concept
    pub async fn concept_summary(&self, concept: &ProductConcept) -> Result<String, GatewayError> {
        debug!(name = %concept.name, "concept_summary: called");
        let payload = json!({ "concept": concept });
        summary_or_fallback(self.generate_text(PromptKind::ConceptSummary, &payload).await)
    }

    /// Short hints for the chapter the user is filling in
    pub async fn chapter_help(&self, chapter: &Chapter, concept: &ProductConcept) -> Result<String, GatewayError> {
        debug!(chapter = chapter.id, "chapter_help: called");
        let answers: Vec<AnswerLine<'_>> = chapter
            .fields
            .iter()
            .map(|field| AnswerLine {
                label: field.label(),
                value: field.get(concept),
            })
            .collect();
        let payload = json!({
            "chapter": { "title": chapter.title, "subtitle": chapter.subtitle, "why": chapter.why },
            "answers": answers,
        });
        self.generate_text(PromptKind::ChapterHelp, &payload).await
    }

    /// Answer a follow-up question about a generated roadmap
    pub async fn roadmap_chat(&self, steps: &[WorkshopStep], question: &str) -> Result<String, GatewayError> {
        debug!(steps = steps.len(), question_len = question.len(), "roadmap_chat: called");
        let steps = serde_json::to_string(steps).map_err(|e| GatewayError::Template(e.to_string()))?;
        let payload = json!({ "steps": steps, "question": question });
        self.generate_text(PromptKind::RoadmapChat, &payload).await
    }

    /// Explain a technical term in plain words
    pub async fn translate_jargon(&self, term: &str) -> Result<JargonTranslation, GatewayError> {
        debug!(%term, "translate_jargon: called");
        let payload = json!({ "term": term });
        self.generate_json(PromptKind::JargonTranslation, &payload).await
    }
}

fn summary_or_fallback(result: Result<String, GatewayError>) -> Result<String, GatewayError> {
    match result {
        Ok(summary) => Ok(summary),
        Err(GatewayError::EmptyResponse) => {
            debug!("summary_or_fallback: empty summary, using fallback");
            Ok(SUMMARY_FALLBACK.to_string())
        }
        Err(e) => Err(e),
    }
}
