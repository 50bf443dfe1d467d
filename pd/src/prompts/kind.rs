//! What each kind of request asks the model for
//!
//! Pure configuration: a template, the system instructions that go with it
//! and, for structured answers, the response schema.

use std::fmt;

use crate::llm::Schema;

/// Every request the gateway knows how to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    ClarifyingQuestions,
    FinalWorkflow,
    PlainSummary,
    ConceptWorkshop,
    ConceptSummary,
    ChapterHelp,
    RoadmapChat,
    JargonTranslation,
}

const ACTION_STEP_FIELDS: &[&str] = &["title", "whatToDo", "whyMatters", "output"];
const CHAPTER_STEP_FIELDS: &[&str] = &["title", "description", "actionItem", "learningLens", "whyThisMatters"];
const TRANSLATION_FIELDS: &[&str] = &["original", "plainVersion", "analogy"];

impl PromptKind {
    /// Template rendered into the user prompt
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::ClarifyingQuestions => "clarifying-questions",
            Self::FinalWorkflow => "final-workflow",
            Self::PlainSummary => "plain-summary",
            Self::ConceptWorkshop => "concept-workshop",
            Self::ConceptSummary => "concept-summary",
            Self::ChapterHelp => "chapter-help",
            Self::RoadmapChat => "roadmap-chat",
            Self::JargonTranslation => "translate-jargon",
        }
    }

    /// Templates concatenated into the system instruction
    pub fn system_templates(&self) -> &'static [&'static str] {
        match self {
            Self::ClarifyingQuestions | Self::FinalWorkflow => &["system", "workflow-builder"],
            _ => &["system"],
        }
    }

    /// Response schema; `None` means plain text
    pub fn schema(&self) -> Option<Schema> {
        match self {
            Self::ClarifyingQuestions => Some(Schema::string_array()),
            Self::FinalWorkflow => Some(Schema::array_of(Schema::string_object(ACTION_STEP_FIELDS))),
            Self::ConceptWorkshop => Some(Schema::array_of(Schema::string_object(CHAPTER_STEP_FIELDS))),
            Self::JargonTranslation => Some(Schema::string_object(TRANSLATION_FIELDS)),
            Self::PlainSummary | Self::ConceptSummary | Self::ChapterHelp | Self::RoadmapChat => None,
        }
    }

    pub fn wants_json(&self) -> bool {
        self.schema().is_some()
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template_name())
    }
}
