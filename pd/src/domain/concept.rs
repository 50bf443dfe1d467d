//! Product concept captured by the four-chapter workshop form

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who is building the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    #[default]
    Solo,
    Team,
    Hiring,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Team => "team",
            Self::Hiring => "hiring",
        }
    }
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TeamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "team" => Ok(Self::Team),
            "hiring" => Ok(Self::Hiring),
            other => Err(format!("Unknown team status '{}'. Expected solo, team or hiring", other)),
        }
    }
}

/// A user's product idea
///
/// Built from form input and frozen once submitted for generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductConcept {
    pub name: String,
    pub target_audience: String,
    pub core_problem: String,
    pub opportunity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspiration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_concepts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges: Option<String>,
    pub team_status: TeamStatus,
}

impl ProductConcept {
    /// Name and core problem are the two fields generation cannot do without
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.core_problem.trim().is_empty()
    }

    /// Read a field through the field table
    pub fn get(&self, field: ConceptField) -> &str {
        field.get(self)
    }

    /// Write a field through the field table
    pub fn set(&mut self, field: ConceptField, value: impl Into<String>) {
        field.set(self, value.into());
    }
}

/// Every editable text field of a `ProductConcept`
///
/// The form binds to these instead of looking fields up by name, so the set
/// of editable fields is closed and known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptField {
    Name,
    Opportunity,
    Inspiration,
    TargetAudience,
    CoreProblem,
    Hypothesis,
    TestConcepts,
    Gaps,
    Challenges,
}

impl ConceptField {
    pub const ALL: [ConceptField; 9] = [
        Self::Name,
        Self::Opportunity,
        Self::Inspiration,
        Self::TargetAudience,
        Self::CoreProblem,
        Self::Hypothesis,
        Self::TestConcepts,
        Self::Gaps,
        Self::Challenges,
    ];

    /// Stable key, matching the serialized field name
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Opportunity => "opportunity",
            Self::Inspiration => "inspiration",
            Self::TargetAudience => "targetAudience",
            Self::CoreProblem => "coreProblem",
            Self::Hypothesis => "hypothesis",
            Self::TestConcepts => "testConcepts",
            Self::Gaps => "gaps",
            Self::Challenges => "challenges",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Idea Name",
            Self::Opportunity => "The Opportunity",
            Self::Inspiration => "The Spark",
            Self::TargetAudience => "Target Audience",
            Self::CoreProblem => "The Core Problem",
            Self::Hypothesis => "Your Guess",
            Self::TestConcepts => "The Simple Test",
            Self::Gaps => "What is missing?",
            Self::Challenges => "Main Obstacles",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::Name => "What do you call it?",
            Self::Opportunity => "What special chance did you see?",
            Self::Inspiration => "What gave you this idea?",
            Self::TargetAudience => "Who is this for?",
            Self::CoreProblem => "What is their biggest struggle?",
            Self::Hypothesis => "If we build this, what happens?",
            Self::TestConcepts => "How can we prove this easily?",
            Self::Gaps => "Money, skills, or data?",
            Self::Challenges => "What is the hardest part?",
        }
    }

    /// Find a field by key; accepts camelCase and kebab-case
    pub fn from_key(key: &str) -> Option<Self> {
        debug!(%key, "ConceptField::from_key: called");
        let normalized: String = key.chars().filter(|c| *c != '-' && *c != '_').collect::<String>().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.key().to_lowercase() == normalized)
    }

    pub fn get<'a>(&self, concept: &'a ProductConcept) -> &'a str {
        match self {
            Self::Name => &concept.name,
            Self::Opportunity => &concept.opportunity,
            Self::Inspiration => concept.inspiration.as_deref().unwrap_or(""),
            Self::TargetAudience => &concept.target_audience,
            Self::CoreProblem => &concept.core_problem,
            Self::Hypothesis => concept.hypothesis.as_deref().unwrap_or(""),
            Self::TestConcepts => concept.test_concepts.as_deref().unwrap_or(""),
            Self::Gaps => concept.gaps.as_deref().unwrap_or(""),
            Self::Challenges => concept.challenges.as_deref().unwrap_or(""),
        }
    }

    /// Blank values clear optional fields
    pub fn set(&self, concept: &mut ProductConcept, value: String) {
        let optional = if value.trim().is_empty() { None } else { Some(value.clone()) };
        match self {
            Self::Name => concept.name = value,
            Self::Opportunity => concept.opportunity = value,
            Self::Inspiration => concept.inspiration = optional,
            Self::TargetAudience => concept.target_audience = value,
            Self::CoreProblem => concept.core_problem = value,
            Self::Hypothesis => concept.hypothesis = optional,
            Self::TestConcepts => concept.test_concepts = optional,
            Self::Gaps => concept.gaps = optional,
            Self::Challenges => concept.challenges = optional,
        }
    }
}

impl fmt::Display for ConceptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
