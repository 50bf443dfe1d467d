//! View-model adapter
//!
//! Shapes workflow output into numbered display rows and plain-text exports.
//! Pure functions; source order is always preserved.

use crate::domain::{JargonTranslation, WorkshopStep};
use crate::workflow::PlanResult;

/// One step ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRow {
    /// 1-based position in the plan
    pub number: usize,
    pub title: String,
    /// Free text shown under the title, if the step has one
    pub body: Option<String>,
    /// Labelled detail lines
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanView {
    pub summary: String,
    pub rows: Vec<StepRow>,
}

pub fn step_row(number: usize, step: &WorkshopStep) -> StepRow {
    match step {
        WorkshopStep::Chapter(s) => StepRow {
            number,
            title: s.title.clone(),
            body: Some(s.description.clone()),
            fields: vec![
                ("Next Action", s.action_item.clone()),
                ("Why it matters", s.why_this_matters.clone()),
                ("Focus Lens", s.learning_lens.clone()),
            ],
        },
        WorkshopStep::Action(s) => StepRow {
            number,
            title: s.title.clone(),
            body: None,
            fields: vec![
                ("What to do", s.what_to_do.clone()),
                ("Output", s.output.clone()),
                ("Why it matters", s.why_matters.clone()),
            ],
        },
    }
}

pub fn plan_view(plan: &PlanResult) -> PlanView {
    PlanView {
        summary: plan.summary.clone(),
        rows: plan
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| step_row(idx + 1, step))
            .collect(),
    }
}

/// Summary, then every step numbered with its detail lines
pub fn plan_export(plan: &PlanResult) -> String {
    let view = plan_view(plan);
    let mut lines = vec![view.summary, String::new()];
    for row in view.rows {
        lines.push(format!("{}. {}", row.number, row.title));
        if let Some(body) = row.body {
            lines.push(format!("   {}", body));
        }
        lines.extend(row.fields.into_iter().map(|(label, value)| format!("   {}: {}", label, value)));
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

/// Clipboard text for a translation
pub fn translation_export(t: &JargonTranslation) -> String {
    format!(
        "Word: {}\nEasy English: {}\nSimple Comparison: {}",
        t.original, t.plain_version, t.analogy
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionStep, ChapterStep};

    fn action(title: &str) -> WorkshopStep {
        WorkshopStep::Action(ActionStep {
            title: title.to_string(),
            what_to_do: format!("do {}", title),
            output: "notes".to_string(),
            why_matters: "because".to_string(),
        })
    }

    #[test]
    fn test_rows_are_numbered_in_order() {
        let plan = PlanResult {
            steps: vec![action("first"), action("second"), action("third")],
            summary: "A plan.".to_string(),
        };
        let view = plan_view(&plan);

        assert_eq!(view.summary, "A plan.");
        let numbered: Vec<_> = view.rows.iter().map(|r| (r.number, r.title.as_str())).collect();
        assert_eq!(numbered, [(1, "first"), (2, "second"), (3, "third")]);
        assert_eq!(view.rows[0].fields[0], ("What to do", "do first".to_string()));
    }

    #[test]
    fn test_chapter_step_row() {
        let step = WorkshopStep::Chapter(ChapterStep {
            title: "The Vision".to_string(),
            description: "Say what it is".to_string(),
            action_item: "Write one sentence".to_string(),
            learning_lens: "Value proposition".to_string(),
            why_this_matters: "Clarity".to_string(),
        });
        let row = step_row(1, &step);

        assert_eq!(row.body.as_deref(), Some("Say what it is"));
        assert_eq!(row.fields[0].0, "Next Action");
        assert_eq!(row.fields[2], ("Focus Lens", "Value proposition".to_string()));
    }

    #[test]
    fn test_plan_export() {
        let plan = PlanResult {
            steps: vec![action("read")],
            summary: "Learn by reading.".to_string(),
        };
        assert_eq!(
            plan_export(&plan),
            "Learn by reading.\n\n1. read\n   What to do: do read\n   Output: notes\n   Why it matters: because"
        );
    }

    #[test]
    fn test_translation_export_mvp() {
        let t = JargonTranslation {
            original: "MVP".to_string(),
            plain_version: "A basic first version".to_string(),
            analogy: "A paper airplane before a jet".to_string(),
        };
        assert_eq!(
            translation_export(&t),
            "Word: MVP\nEasy English: A basic first version\nSimple Comparison: A paper airplane before a jet"
        );
    }
}
