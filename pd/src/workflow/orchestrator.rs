//! Workflow orchestrator
//!
//! Owns the stage machine and the transient workshop state. Every gateway
//! failure puts the stage back where it was before the call and leaves one
//! user-facing message in `error`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Pending, PlanResult, Stage, WorkflowError, WorkflowInput, WorkflowStrategy};
use crate::domain::{Chapter, ClarifyingQuestions, ProductConcept};
use crate::gateway::{Gateway, GatewayError, Surface};

/// Shown when chapter hints cannot be fetched
pub const CHAPTER_HELP_FALLBACK: &str = "Keep your description focused on the human problem, not the tech.";

/// Shown when a roadmap question cannot be answered
pub const CHAT_FALLBACK: &str = "I'm unable to answer that right now.";

/// Read-only copy of the orchestrator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub session_id: Uuid,
    pub strategy: &'static str,
    pub stage: Stage,
    pub questions: Vec<String>,
    pub result: Option<PlanResult>,
    pub chat_response: Option<String>,
    pub chapter_help: Option<String>,
    pub error: Option<String>,
}

pub struct Orchestrator {
    session_id: Uuid,
    gateway: Arc<Gateway>,
    strategy: Arc<dyn WorkflowStrategy>,
    stage_tx: watch::Sender<Stage>,
    input: Option<WorkflowInput>,
    questions: ClarifyingQuestions,
    result: Option<PlanResult>,
    chat_response: Option<String>,
    chapter_help: Option<String>,
    error: Option<String>,
}

impl Orchestrator {
    pub fn new(gateway: Arc<Gateway>, strategy: Arc<dyn WorkflowStrategy>) -> Self {
        let session_id = Uuid::now_v7();
        debug!(%session_id, strategy = strategy.name(), "Orchestrator::new: called");
        let (stage_tx, _) = watch::channel(Stage::Input);
        Self {
            session_id,
            gateway,
            strategy,
            stage_tx,
            input: None,
            questions: ClarifyingQuestions::default(),
            result: None,
            chat_response: None,
            chapter_help: None,
            error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        *self.stage_tx.borrow()
    }

    /// Watch stage changes, including the generating stages
    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.stage_tx.subscribe()
    }

    fn set_stage(&self, stage: Stage) {
        debug!(session_id = %self.session_id, %stage, "set_stage: called");
        self.stage_tx.send_replace(stage);
    }

    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<(), WorkflowError> {
        let stage = self.stage();
        if stage == expected {
            Ok(())
        } else {
            debug!(%stage, %action, "expect_stage: invalid transition");
            Err(WorkflowError::InvalidTransition { action, stage })
        }
    }

    /// Revert to `stage`, keep the user message and log the kind
    fn fail(&mut self, stage: Stage, err: GatewayError) -> WorkflowError {
        warn!(session_id = %self.session_id, kind = err.kind(), error = %err, "workflow request failed");
        let message = err.user_message(Surface::Workshop);
        self.error = Some(message.to_string());
        self.set_stage(stage);
        WorkflowError::Generation { message, source: err }
    }

    /// Submit the initial input
    ///
    /// Asks for clarifying questions; with none coming back the plan is
    /// generated straight away and the Questions stage is skipped.
    pub async fn begin(&mut self, input: WorkflowInput) -> Result<Stage, WorkflowError> {
        debug!(session_id = %self.session_id, "begin: called");
        self.expect_stage(Stage::Input, "begin")?;
        self.strategy.validate(&input)?;

        self.error = None;
        self.set_stage(Stage::Generating(Pending::Questions));
        let clarified = self.strategy.clarify(&self.gateway, &input).await;
        let questions = match clarified {
            Ok(questions) => questions,
            Err(e) => return Err(self.fail(Stage::Input, e)),
        };

        if questions.is_empty() {
            debug!("begin: no clarifying questions, planning directly");
            self.set_stage(Stage::Generating(Pending::Plan));
            let result = self.strategy.plan(&self.gateway, &input, "").await;
            return match result {
                Ok(plan) => {
                    self.input = Some(input);
                    Ok(self.finish(plan))
                }
                Err(e) => Err(self.fail(Stage::Input, e)),
            };
        }

        info!(session_id = %self.session_id, count = questions.len(), "clarifying questions received");
        self.input = Some(input);
        self.questions = questions;
        self.set_stage(Stage::Questions);
        Ok(Stage::Questions)
    }

    /// Fold the answers into the prompt and generate the plan
    ///
    /// Answers are keyed by question position; missing ones become "No answer".
    pub async fn answer_and_continue(&mut self, answers: &BTreeMap<usize, String>) -> Result<Stage, WorkflowError> {
        debug!(session_id = %self.session_id, answers = answers.len(), "answer_and_continue: called");
        self.expect_stage(Stage::Questions, "answer questions")?;
        let Some(input) = self.input.clone() else {
            return Err(WorkflowError::InvalidTransition {
                action: "answer questions",
                stage: self.stage(),
            });
        };

        let folded = self.questions.fold(answers);
        self.error = None;
        self.set_stage(Stage::Generating(Pending::Plan));
        let planned = self.strategy.plan(&self.gateway, &input, &folded).await;
        match planned {
            Ok(plan) => {
                self.questions = ClarifyingQuestions::default();
                Ok(self.finish(plan))
            }
            Err(e) => Err(self.fail(Stage::Questions, e)),
        }
    }

    fn finish(&mut self, plan: PlanResult) -> Stage {
        info!(session_id = %self.session_id, steps = plan.steps.len(), "plan ready");
        self.result = Some(plan);
        self.set_stage(Stage::Result);
        Stage::Result
    }

    /// Back to Input, dropping everything from this session
    pub fn reset(&mut self) {
        debug!(session_id = %self.session_id, "reset: called");
        self.session_id = Uuid::now_v7();
        self.input = None;
        self.questions = ClarifyingQuestions::default();
        self.result = None;
        self.chat_response = None;
        self.chapter_help = None;
        self.error = None;
        self.set_stage(Stage::Input);
    }

    /// Hints for the chapter being filled in
    ///
    /// Never fails on a gateway error; the fallback hint is returned instead.
    pub async fn chapter_help(&mut self, chapter_id: u8, concept: &ProductConcept) -> Result<String, WorkflowError> {
        debug!(session_id = %self.session_id, %chapter_id, "chapter_help: called");
        self.expect_stage(Stage::Input, "ask for chapter help")?;
        if !self.strategy.offers_chapter_help() {
            return Err(WorkflowError::Validation(format!(
                "Chapter help is not available in the {} workshop.",
                self.strategy.name()
            )));
        }
        let chapter = Chapter::by_id(chapter_id)
            .ok_or_else(|| WorkflowError::Validation(format!("Unknown chapter {}. Expected 1 to 4.", chapter_id)))?;

        let generated = self.gateway.chapter_help(chapter, concept).await;
        let help = match generated {
            Ok(help) => help,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "chapter_help: using fallback");
                CHAPTER_HELP_FALLBACK.to_string()
            }
        };
        self.chapter_help = Some(help.clone());
        Ok(help)
    }

    /// Ask a question about the finished roadmap
    ///
    /// A blank question is ignored and returns `None`.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>, WorkflowError> {
        debug!(session_id = %self.session_id, question_len = question.len(), "ask: called");
        self.expect_stage(Stage::Result, "ask about the roadmap")?;
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }
        let steps = self.result.as_ref().map(|r| r.steps.as_slice()).unwrap_or_default();

        let generated = self.gateway.roadmap_chat(steps, question).await;
        let answer = match generated {
            Ok(answer) => answer,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "ask: using fallback");
                CHAT_FALLBACK.to_string()
            }
        };
        self.chat_response = Some(answer.clone());
        Ok(Some(answer))
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            session_id: self.session_id,
            strategy: self.strategy.name(),
            stage: self.stage(),
            questions: self.questions.questions().to_vec(),
            result: self.result.clone(),
            chat_response: self.chat_response.clone(),
            chapter_help: self.chapter_help.clone(),
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TeamStatus, WorkshopStep};
    use crate::gateway::{PromptLimits, WORKSHOP_GENERIC_MESSAGE, WORKSHOP_SAFETY_MESSAGE};
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{GenerateResponse, LlmError};
    use crate::prompts::PromptLoader;
    use crate::workflow::{ConceptStrategy, GuidedStrategy};

    const QUESTIONS: &str = r#"["What is driving the change?", "How much time can you give it?"]"#;
    const STEPS: &str = r#"[{"title":"Read","whatToDo":"Read Inspired","output":"Notes","whyMatters":"Vocabulary"}]"#;
    const CHAPTER_STEPS: &str = r#"[
        {"title":"Vision","description":"d","actionItem":"a","learningLens":"l","whyThisMatters":"w"},
        {"title":"People","description":"d","actionItem":"a","learningLens":"l","whyThisMatters":"w"}
    ]"#;

    fn guided(mock: Arc<MockLlmClient>) -> Orchestrator {
        let gateway = Gateway::new(mock, Arc::new(PromptLoader::embedded_only()), 1024, PromptLimits::default());
        Orchestrator::new(Arc::new(gateway), Arc::new(GuidedStrategy))
    }

    fn concept_flow(mock: Arc<MockLlmClient>) -> Orchestrator {
        let gateway = Gateway::new(mock, Arc::new(PromptLoader::embedded_only()), 1024, PromptLimits::default());
        Orchestrator::new(Arc::new(gateway), Arc::new(ConceptStrategy))
    }

    fn goal(text: &str) -> WorkflowInput {
        WorkflowInput::Goal(text.to_string())
    }

    fn plantly() -> ProductConcept {
        ProductConcept {
            name: "Plantly".to_string(),
            core_problem: "Plants die while owners travel".to_string(),
            team_status: TeamStatus::Team,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_request() {
        let mock = Arc::new(MockLlmClient::with_texts(&[]));
        let mut orch = guided(mock.clone());

        for input in ["", "   "] {
            let err = orch.begin(goal(input)).await.unwrap_err();
            assert!(matches!(err, WorkflowError::Validation(_)));
            assert_eq!(orch.stage(), Stage::Input);
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_full_guided_flow() {
        let mock = Arc::new(MockLlmClient::with_texts(&[QUESTIONS, STEPS, "Learn PM by doing."]));
        let mut orch = guided(mock.clone());

        let stage = orch.begin(goal("I want to learn product management")).await.unwrap();
        assert_eq!(stage, Stage::Questions);
        assert_eq!(orch.snapshot().questions.len(), 2);

        let answers = BTreeMap::from([(0, "career switch".to_string()), (1, "3 months".to_string())]);
        let stage = orch.answer_and_continue(&answers).await.unwrap();
        assert_eq!(stage, Stage::Result);

        let plan_prompt = &mock.requests()[1].prompt;
        assert!(plan_prompt.contains(
            "Q: What is driving the change? A: career switch; Q: How much time can you give it? A: 3 months"
        ));

        let snap = orch.snapshot();
        let result = snap.result.unwrap();
        assert_eq!(result.summary, "Learn PM by doing.");
        assert_eq!(result.steps[0].title(), "Read");
        assert!(snap.questions.is_empty());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_questions_skips_questions_stage() {
        let mock = Arc::new(MockLlmClient::with_texts(&["[]", STEPS, "Summary."]));
        let mut orch = guided(mock.clone());
        let mut stages = orch.subscribe();

        let stage = orch.begin(goal("Build a portfolio")).await.unwrap();
        assert_eq!(stage, Stage::Result);
        assert!(stages.has_changed().unwrap());
        assert_eq!(*stages.borrow_and_update(), Stage::Result);
        assert!(mock.requests()[1].prompt.contains("None given"));
    }

    #[tokio::test]
    async fn test_safety_block_reverts_with_safety_message() {
        let mock = Arc::new(MockLlmClient::new(vec![Err(LlmError::Blocked {
            reason: "SAFETY".to_string(),
        })]));
        let mut orch = guided(mock);

        let err = orch.begin(goal("something odd")).await.unwrap_err();
        assert_eq!(err.user_message(), WORKSHOP_SAFETY_MESSAGE);
        assert_eq!(orch.stage(), Stage::Input);
        assert_eq!(orch.snapshot().error.as_deref(), Some(WORKSHOP_SAFETY_MESSAGE));
    }

    #[tokio::test]
    async fn test_transport_failure_during_plan_stays_in_questions() {
        let mock = Arc::new(MockLlmClient::new(vec![
            Ok(GenerateResponse::from_text(QUESTIONS)),
            Err(LlmError::ApiError {
                status: 503,
                message: "down".to_string(),
            }),
        ]));
        let mut orch = guided(mock);

        orch.begin(goal("learn PM")).await.unwrap();
        let err = orch.answer_and_continue(&BTreeMap::new()).await.unwrap_err();

        assert_eq!(err.user_message(), WORKSHOP_GENERIC_MESSAGE);
        assert_eq!(orch.stage(), Stage::Questions);
        assert_eq!(orch.snapshot().questions.len(), 2);
        assert!(orch.snapshot().result.is_none());
    }

    #[tokio::test]
    async fn test_empty_plan_is_an_error() {
        let mock = Arc::new(MockLlmClient::with_texts(&["[]", "[]"]));
        let mut orch = guided(mock);

        let err = orch.begin(goal("learn PM")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Generation {
                source: GatewayError::EmptyResponse,
                ..
            }
        ));
        assert_eq!(orch.stage(), Stage::Input);
    }

    #[tokio::test]
    async fn test_wrong_stage_is_rejected() {
        let mock = Arc::new(MockLlmClient::with_texts(&[]));
        let mut orch = guided(mock);

        let err = orch.answer_and_continue(&BTreeMap::new()).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                action: "answer questions",
                stage: Stage::Input
            }
        );
        assert!(matches!(orch.ask("why?").await, Err(WorkflowError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mock = Arc::new(MockLlmClient::with_texts(&["[]", STEPS, "Summary.", "Because."]));
        let mut orch = guided(mock);

        orch.begin(goal("learn PM")).await.unwrap();
        orch.ask("Why step one?").await.unwrap();
        let before = orch.snapshot();
        assert!(before.result.is_some());
        assert!(before.chat_response.is_some());

        orch.reset();
        let after = orch.snapshot();
        assert_eq!(after.stage, Stage::Input);
        assert!(after.questions.is_empty());
        assert!(after.result.is_none());
        assert!(after.chat_response.is_none());
        assert!(after.error.is_none());
        assert_ne!(after.session_id, before.session_id);
    }

    #[tokio::test]
    async fn test_ask_ignores_blank_and_falls_back() {
        let mock = Arc::new(MockLlmClient::new(vec![
            Ok(GenerateResponse::from_text("[]")),
            Ok(GenerateResponse::from_text(STEPS)),
            Ok(GenerateResponse::from_text("Summary.")),
            Err(LlmError::Timeout(std::time::Duration::from_secs(1))),
        ]));
        let mut orch = guided(mock.clone());
        orch.begin(goal("learn PM")).await.unwrap();

        assert_eq!(orch.ask("   ").await.unwrap(), None);
        assert_eq!(mock.call_count(), 3);

        assert_eq!(orch.ask("What first?").await.unwrap().as_deref(), Some(CHAT_FALLBACK));
        assert_eq!(orch.stage(), Stage::Result);
    }

    #[tokio::test]
    async fn test_concept_flow_runs_plan_and_summary_together() {
        let mock = Arc::new(MockLlmClient::from_fn(|req| {
            if req.wants_json() {
                Ok(GenerateResponse::from_text(CHAPTER_STEPS))
            } else {
                Ok(GenerateResponse::from_text("Plant care while you travel."))
            }
        }));
        let mut orch = concept_flow(mock.clone());

        let stage = orch.begin(WorkflowInput::Concept(plantly())).await.unwrap();
        assert_eq!(stage, Stage::Result);
        assert_eq!(mock.call_count(), 2);

        let result = orch.snapshot().result.unwrap();
        assert_eq!(result.summary, "Plant care while you travel.");
        assert!(matches!(result.steps[0], WorkshopStep::Chapter(_)));
    }

    #[tokio::test]
    async fn test_concept_requires_name_and_problem() {
        let mock = Arc::new(MockLlmClient::with_texts(&[]));
        let mut orch = concept_flow(mock.clone());

        let err = orch.begin(WorkflowInput::Concept(ProductConcept::default())).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_concept_failure_reverts_to_input() {
        let mock = Arc::new(MockLlmClient::from_fn(|req| {
            if req.wants_json() {
                Err(LlmError::InvalidResponse("bad".to_string()))
            } else {
                Ok(GenerateResponse::from_text("Summary."))
            }
        }));
        let mut orch = concept_flow(mock);

        assert!(orch.begin(WorkflowInput::Concept(plantly())).await.is_err());
        assert_eq!(orch.stage(), Stage::Input);
        assert!(orch.snapshot().result.is_none());
    }

    #[tokio::test]
    async fn test_chapter_help_falls_back() {
        let mock = Arc::new(MockLlmClient::new(vec![
            Ok(GenerateResponse::from_text("Name the person, not the app.")),
            Err(LlmError::Timeout(std::time::Duration::from_secs(1))),
        ]));
        let mut orch = concept_flow(mock.clone());

        let help = orch.chapter_help(2, &plantly()).await.unwrap();
        assert_eq!(help, "Name the person, not the app.");
        assert!(mock.requests()[0].prompt.contains("The People"));

        let help = orch.chapter_help(2, &plantly()).await.unwrap();
        assert_eq!(help, CHAPTER_HELP_FALLBACK);
        assert_eq!(orch.stage(), Stage::Input);

        assert!(matches!(orch.chapter_help(9, &plantly()).await, Err(WorkflowError::Validation(_))));
    }

    #[tokio::test]
    async fn test_chapter_help_not_in_guided() {
        let mock = Arc::new(MockLlmClient::with_texts(&[]));
        let mut orch = guided(mock);
        assert!(orch.chapter_help(1, &plantly()).await.is_err());
    }
}
