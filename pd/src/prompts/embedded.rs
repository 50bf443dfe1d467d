//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// House style shared by every request
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Extra instruction for the guided workflow builder
pub const WORKFLOW_BUILDER: &str = include_str!("../../prompts/workflow-builder.pmt");

pub const CLARIFYING_QUESTIONS: &str = include_str!("../../prompts/clarifying-questions.pmt");
pub const FINAL_WORKFLOW: &str = include_str!("../../prompts/final-workflow.pmt");
pub const PLAIN_SUMMARY: &str = include_str!("../../prompts/plain-summary.pmt");
pub const TRANSLATE_JARGON: &str = include_str!("../../prompts/translate-jargon.pmt");
pub const CONCEPT_WORKSHOP: &str = include_str!("../../prompts/concept-workshop.pmt");
pub const CONCEPT_SUMMARY: &str = include_str!("../../prompts/concept-summary.pmt");
pub const CHAPTER_HELP: &str = include_str!("../../prompts/chapter-help.pmt");
pub const ROADMAP_CHAT: &str = include_str!("../../prompts/roadmap-chat.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    let prompt = match name {
        "system" => SYSTEM,
        "workflow-builder" => WORKFLOW_BUILDER,
        "clarifying-questions" => CLARIFYING_QUESTIONS,
        "final-workflow" => FINAL_WORKFLOW,
        "plain-summary" => PLAIN_SUMMARY,
        "translate-jargon" => TRANSLATE_JARGON,
        "concept-workshop" => CONCEPT_WORKSHOP,
        "concept-summary" => CONCEPT_SUMMARY,
        "chapter-help" => CHAPTER_HELP,
        "roadmap-chat" => ROADMAP_CHAT,
        _ => {
            debug!("get_embedded: no match found");
            return None;
        }
    };
    Some(prompt)
}
