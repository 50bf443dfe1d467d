//! Domain types for Plain Digital
//!
//! Plain data: concepts, generated steps, translations, questions, views and
//! the static catalogs (tiers, books, chapters). No I/O lives here.

mod chapter;
mod concept;
mod library;
mod questions;
mod step;
mod tier;
mod translation;
mod view;

pub use chapter::{CHAPTERS, Chapter};
pub use concept::{ConceptField, ProductConcept, TeamStatus};
pub use library::{BOOKS, Book, books_in};
pub use questions::{ClarifyingQuestions, MAX_QUESTIONS, NO_ANSWER};
pub use step::{ActionStep, ChapterStep, WorkshopStep};
pub use tier::{ServiceTier, TIERS};
pub use translation::{JargonTranslation, SUGGESTIONS};
pub use view::AppView;
