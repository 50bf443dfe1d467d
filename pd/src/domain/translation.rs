//! Jargon translation record

use serde::{Deserialize, Serialize};

/// Plain-language explanation of one technical term
///
/// Replaced wholesale by every new query; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JargonTranslation {
    pub original: String,
    pub plain_version: String,
    pub analogy: String,
}

/// Terms offered as one-click examples in the translator
pub const SUGGESTIONS: [&str; 4] = ["Technical Debt", "Iterative Deployment", "MVP", "Stakeholder Management"];
