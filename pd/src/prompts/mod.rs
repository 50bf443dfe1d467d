//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for every generation
//! request.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (user override, from config)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod kind;
mod loader;

pub use kind::PromptKind;
pub use loader::{PromptError, PromptLoader};
