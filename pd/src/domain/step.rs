//! Generated plan steps
//!
//! Steps only ever come out of parsed model output. The two workshop flows
//! ask for different shapes, so there is one struct per shape and an enum
//! that carries either.

use serde::{Deserialize, Serialize};

/// A chapter step, produced by the concept workshop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterStep {
    pub title: String,
    pub description: String,
    pub action_item: String,
    pub learning_lens: String,
    pub why_this_matters: String,
}

/// An action step, produced by the guided workflow builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    pub title: String,
    pub what_to_do: String,
    pub output: String,
    pub why_matters: String,
}

/// One step of a generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkshopStep {
    Chapter(ChapterStep),
    Action(ActionStep),
}

impl WorkshopStep {
    pub fn title(&self) -> &str {
        match self {
            Self::Chapter(s) => &s.title,
            Self::Action(s) => &s.title,
        }
    }
}

impl From<ChapterStep> for WorkshopStep {
    fn from(step: ChapterStep) -> Self {
        Self::Chapter(step)
    }
}

impl From<ActionStep> for WorkshopStep {
    fn from(step: ActionStep) -> Self {
        Self::Action(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_step_wire_names() {
        let step: ActionStep = serde_json::from_str(
            r#"{"title":"Pick a course","whatToDo":"Enroll","output":"A schedule","whyMatters":"Structure"}"#,
        )
        .unwrap();
        assert_eq!(step.what_to_do, "Enroll");
        assert_eq!(step.why_matters, "Structure");
    }

    #[test]
    fn test_untagged_step_serializes_flat() {
        let step = WorkshopStep::from(ChapterStep {
            title: "Talk to users".to_string(),
            description: "Find five renters".to_string(),
            action_item: "Book three calls".to_string(),
            learning_lens: "Listen for pain".to_string(),
            why_this_matters: "Evidence beats guesses".to_string(),
        });

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["actionItem"], "Book three calls");
        assert_eq!(step.title(), "Talk to users");
    }
}
