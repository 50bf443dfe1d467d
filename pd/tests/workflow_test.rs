//! Integration tests for the Plain Digital workshop
//!
//! These drive the public API end to end: gateway, strategies, orchestrator
//! and the actor-backed manager, against a scripted model.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use plaindigital::domain::{ProductConcept, TeamStatus, WorkshopStep};
use plaindigital::gateway::{Gateway, PromptLimits, WORKSHOP_GENERIC_MESSAGE, WORKSHOP_SAFETY_MESSAGE};
use plaindigital::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError};
use plaindigital::prompts::PromptLoader;
use plaindigital::translator::Translator;
use plaindigital::workflow::{
    CONCEPT_INCOMPLETE_MESSAGE, Orchestrator, Stage, WorkflowError, WorkflowInput, WorkflowManager, WorkflowVariant,
};

// =============================================================================
// Scripted model
// =============================================================================

type Route = (&'static str, Result<&'static str, &'static str>);

/// Answers by matching the start of the user prompt
///
/// `Err(reason)` replies are returned as safety blocks.
struct ScriptedClient {
    routes: Vec<Route>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(routes: Vec<Route>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let route = self.routes.iter().find(|(prefix, _)| request.prompt.starts_with(prefix));
        match route {
            Some((_, Ok(text))) => Ok(GenerateResponse::from_text(*text)),
            Some((_, Err(reason))) => Err(LlmError::Blocked {
                reason: reason.to_string(),
            }),
            None => Err(LlmError::InvalidResponse(format!("no route for: {}", request.prompt))),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn gateway(client: Arc<ScriptedClient>) -> Arc<Gateway> {
    Arc::new(Gateway::new(
        client,
        Arc::new(PromptLoader::embedded_only()),
        2048,
        PromptLimits::default(),
    ))
}

const QUESTIONS: &str = r#"```json
["Do you have customers yet?", "How much time per week?"]
```"#;

const STEPS: &str = r#"Here you go: [
  {"title": "Talk to bakers", "whatToDo": "Call five bakeries", "whyMatters": "Learn their pain", "output": "Notes"},
  {"title": "Sketch the app", "whatToDo": "Draw three screens", "whyMatters": "Make it real", "output": "Paper sketches"}
]"#;

const CHAPTER_STEPS: &str = r#"[
  {"title": "The Vision", "description": "Name it", "actionItem": "Write one line", "learningLens": "Value", "whyThisMatters": "Focus"},
  {"title": "The People", "description": "Find them", "actionItem": "Interview three", "learningLens": "Empathy", "whyThisMatters": "Fit"},
  {"title": "The Bet", "description": "Guess", "actionItem": "Landing page", "learningLens": "Testing", "whyThisMatters": "Risk"},
  {"title": "The Reality", "description": "Gaps", "actionItem": "List blockers", "learningLens": "Honesty", "whyThisMatters": "Trust"}
]"#;

fn concept() -> ProductConcept {
    ProductConcept {
        name: "Plantr".to_string(),
        target_audience: "Busy plant owners".to_string(),
        core_problem: "Plants die while they travel".to_string(),
        opportunity: "Cheap soil sensors".to_string(),
        team_status: TeamStatus::Solo,
        ..Default::default()
    }
}

// =============================================================================
// Guided workshop
// =============================================================================

#[tokio::test]
async fn test_guided_workshop_end_to_end() {
    let client = ScriptedClient::new(vec![
        ("User context:", Ok(QUESTIONS)),
        ("Initial Context:", Ok(STEPS)),
        ("Summarize this workflow", Ok("  Talk to bakers, then sketch.  ")),
        ("Here is the user's roadmap", Ok("Start with the bakers.")),
    ]);
    let manager = WorkflowManager::spawn(Orchestrator::new(
        gateway(client.clone()),
        WorkflowVariant::Guided.strategy(),
    ));

    let stage = manager
        .begin(WorkflowInput::Goal("Open a bakery app".to_string()))
        .await
        .unwrap();
    assert_eq!(stage, Stage::Questions);
    assert_eq!(manager.snapshot().await.unwrap().questions.len(), 2);

    let answers = BTreeMap::from([(0, "Not yet".to_string())]);
    let stage = manager.answer_and_continue(answers).await.unwrap();
    assert_eq!(stage, Stage::Result);

    let snapshot = manager.snapshot().await.unwrap();
    let plan = snapshot.result.unwrap();
    assert_eq!(plan.summary, "Talk to bakers, then sketch.");
    let titles: Vec<_> = plan
        .steps
        .iter()
        .map(|s| match s {
            WorkshopStep::Action(a) => a.title.as_str(),
            WorkshopStep::Chapter(c) => c.title.as_str(),
        })
        .collect();
    assert_eq!(titles, ["Talk to bakers", "Sketch the app"]);
    assert!(snapshot.questions.is_empty());

    let final_prompt = client
        .prompts()
        .into_iter()
        .find(|p| p.starts_with("Initial Context:"))
        .unwrap();
    assert!(final_prompt.contains("Open a bakery app"));
    assert!(final_prompt.contains("Q: Do you have customers yet? A: Not yet"));
    assert!(final_prompt.contains("Q: How much time per week? A: No answer"));

    let answer = manager.ask("Where do I start?".to_string()).await.unwrap();
    assert_eq!(answer.as_deref(), Some("Start with the bakers."));

    manager.reset().await.unwrap();
    assert_eq!(manager.stage(), Stage::Input);
    manager.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_guided_workshop_without_questions_goes_straight_to_plan() {
    let client = ScriptedClient::new(vec![
        ("User context:", Ok("[]")),
        ("Initial Context:", Ok(STEPS)),
        ("Summarize this workflow", Ok("")),
    ]);
    let manager = WorkflowManager::spawn(Orchestrator::new(gateway(client), WorkflowVariant::Guided.strategy()));

    let stage = manager
        .begin(WorkflowInput::Goal("Learn to budget".to_string()))
        .await
        .unwrap();
    assert_eq!(stage, Stage::Result);

    let plan = manager.snapshot().await.unwrap().result.unwrap();
    assert_eq!(plan.summary, plaindigital::gateway::SUMMARY_FALLBACK);
    assert_eq!(plan.steps.len(), 2);
}

#[tokio::test]
async fn test_safety_block_reverts_to_input() {
    let client = ScriptedClient::new(vec![("User context:", Err("SAFETY"))]);
    let manager = WorkflowManager::spawn(Orchestrator::new(gateway(client), WorkflowVariant::Guided.strategy()));

    let err = manager
        .begin(WorkflowInput::Goal("something risky".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), WORKSHOP_SAFETY_MESSAGE);
    assert_eq!(manager.stage(), Stage::Input);
    assert!(!manager.is_busy());
}

#[tokio::test]
async fn test_malformed_plan_keeps_questions() {
    let client = ScriptedClient::new(vec![
        ("User context:", Ok(QUESTIONS)),
        ("Initial Context:", Ok("I cannot produce JSON today")),
    ]);
    let manager = WorkflowManager::spawn(Orchestrator::new(gateway(client), WorkflowVariant::Guided.strategy()));

    manager
        .begin(WorkflowInput::Goal("Open a shop".to_string()))
        .await
        .unwrap();
    let err = manager.answer_and_continue(BTreeMap::new()).await.unwrap_err();

    assert_eq!(err.user_message(), WORKSHOP_GENERIC_MESSAGE);
    let snapshot = manager.snapshot().await.unwrap();
    assert_eq!(snapshot.stage, Stage::Questions);
    assert_eq!(snapshot.questions.len(), 2);
}

#[tokio::test]
async fn test_blank_goal_is_rejected_without_a_call() {
    let client = ScriptedClient::new(vec![]);
    let manager = WorkflowManager::spawn(Orchestrator::new(
        gateway(client.clone()),
        WorkflowVariant::Guided.strategy(),
    ));

    let err = manager.begin(WorkflowInput::Goal("   ".to_string())).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert!(client.prompts().is_empty());
}

// =============================================================================
// Concept workshop
// =============================================================================

#[tokio::test]
async fn test_concept_workshop_end_to_end() {
    let client = ScriptedClient::new(vec![
        ("A person wants to turn an idea", Ok(CHAPTER_STEPS)),
        ("Describe this product idea", Ok("Plantr keeps your plants alive while you travel.")),
    ]);
    let manager = WorkflowManager::spawn(Orchestrator::new(gateway(client), WorkflowVariant::Concept.strategy()));

    let stage = manager.begin(WorkflowInput::Concept(concept())).await.unwrap();
    assert_eq!(stage, Stage::Result);

    let plan = manager.snapshot().await.unwrap().result.unwrap();
    assert_eq!(plan.steps.len(), 4);
    assert_eq!(plan.summary, "Plantr keeps your plants alive while you travel.");
    assert!(matches!(&plan.steps[3], WorkshopStep::Chapter(c) if c.action_item == "List blockers"));
}

#[tokio::test]
async fn test_incomplete_concept_is_rejected() {
    let client = ScriptedClient::new(vec![]);
    let manager = WorkflowManager::spawn(Orchestrator::new(
        gateway(client.clone()),
        WorkflowVariant::Concept.strategy(),
    ));

    let incomplete = ProductConcept {
        name: "Plantr".to_string(),
        ..Default::default()
    };
    let err = manager.begin(WorkflowInput::Concept(incomplete)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(err.user_message(), CONCEPT_INCOMPLETE_MESSAGE);
    assert_eq!(manager.stage(), Stage::Input);
    assert!(client.prompts().is_empty());
}

// =============================================================================
// Translator
// =============================================================================

#[tokio::test]
async fn test_translator_round() {
    let client = ScriptedClient::new(vec![(
        "",
        Ok(r#"{"original": "Technical Debt", "plainVersion": "Shortcuts you pay for later", "analogy": "A messy kitchen after a rushed dinner"}"#),
    )]);
    let mut translator = Translator::new(gateway(client));

    let translation = translator.translate("Technical Debt").await.unwrap().unwrap();
    assert_eq!(translation.plain_version, "Shortcuts you pay for later");
    assert_eq!(
        translator.clipboard_text().unwrap(),
        "Word: Technical Debt\nEasy English: Shortcuts you pay for later\nSimple Comparison: A messy kitchen after a rushed dinner"
    );
}
