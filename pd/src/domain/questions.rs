//! Clarifying questions and the user's answers
//!
//! Lives only while the workshop waits in the Questions stage. The answers
//! are folded into one string for the plan prompt and then dropped.

use std::collections::BTreeMap;

use tracing::debug;

/// Placeholder for a question the user skipped
pub const NO_ANSWER: &str = "No answer";

/// Upper bound on clarifying questions per workshop
pub const MAX_QUESTIONS: usize = 4;

/// An ordered set of at most `MAX_QUESTIONS` questions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClarifyingQuestions {
    questions: Vec<String>,
}

impl ClarifyingQuestions {
    /// Keep the first `max` non-blank questions, trimmed
    pub fn new(questions: Vec<String>, max: usize) -> Self {
        debug!(count = questions.len(), %max, "ClarifyingQuestions::new: called");
        let questions = questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .take(max.min(MAX_QUESTIONS))
            .collect();
        Self { questions }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Pair every question with its answer as `Q: <q> A: <a>`, joined by `; `
    ///
    /// Answers are keyed by question position. Missing or blank answers become
    /// `NO_ANSWER`; answers for positions without a question are ignored.
    pub fn fold(&self, answers: &BTreeMap<usize, String>) -> String {
        debug!(questions = self.questions.len(), answers = answers.len(), "fold: called");
        self.questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                let answer = answers
                    .get(&idx)
                    .map(|a| a.trim())
                    .filter(|a| !a.is_empty())
                    .unwrap_or(NO_ANSWER);
                format!("Q: {} A: {}", question, answer)
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
