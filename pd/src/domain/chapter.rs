//! The four chapters of the concept form

use super::concept::ConceptField;

/// One section of the concept form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub id: u8,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Why this chapter matters, shown as the chapter tip
    pub why: &'static str,
    pub fields: &'static [ConceptField],
}

pub static CHAPTERS: [Chapter; 4] = [
    Chapter {
        id: 1,
        title: "The Vision",
        subtitle: "Idea & Inspiration",
        why: "Investors want to see that you care about the idea. What is the soul of your product?",
        fields: &[ConceptField::Name, ConceptField::Opportunity, ConceptField::Inspiration],
    },
    Chapter {
        id: 2,
        title: "The People",
        subtitle: "Users & Need",
        why: "Products are for people. We need to know exactly whose life will get better because of your idea.",
        fields: &[ConceptField::TargetAudience, ConceptField::CoreProblem],
    },
    Chapter {
        id: 3,
        title: "The Bet",
        subtitle: "Testing Strategy",
        why: "Building products is a risk. We turn your guesses into a 'bet' that we can actually test.",
        fields: &[ConceptField::Hypothesis, ConceptField::TestConcepts],
    },
    Chapter {
        id: 4,
        title: "The Reality",
        subtitle: "Gaps & Blockers",
        why: "Being honest about gaps shows you are a good leader. It helps people trust you.",
        fields: &[ConceptField::Gaps, ConceptField::Challenges],
    },
];

impl Chapter {
    /// Look up a chapter by its 1-based id
    pub fn by_id(id: u8) -> Option<&'static Chapter> {
        CHAPTERS.iter().find(|c| c.id == id)
    }
}
