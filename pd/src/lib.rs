//! Plain Digital - understandable systems for non-technical founders
//!
//! A guided product workshop, a jargon translator and a live-session booking
//! funnel. Every AI feature goes through one gateway that renders a prompt,
//! calls the model once and normalises the reply.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`prompts`] - Handlebars prompt templates with embedded defaults
//! - [`gateway`] - The single boundary to the model
//! - [`workflow`] - Workshop stage machine, strategies and actor handle
//! - [`translator`] - Jargon translator controller
//! - [`tracking`] - Local store, click log and consent
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod adapter;
pub mod booking;
pub mod cli;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod llm;
pub mod navigation;
pub mod prompts;
pub mod tracking;
pub mod translator;
pub mod workflow;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{AppView, ProductConcept, WorkshopStep};
pub use gateway::{Gateway, GatewayError, PromptLimits};
pub use llm::{GeminiClient, LlmClient, LlmError, create_client};
pub use workflow::{Orchestrator, Stage, WorkflowError, WorkflowManager, WorkflowVariant};
