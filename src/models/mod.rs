//! Data models for briefer.
//!
//! This module contains all the core data structures used throughout the system.

mod playbook;
mod prompt;
mod query;
mod registry;

pub use playbook::{
    Check, DEFAULT_MAX_CONTEXT_TOKENS, Example, KnowledgeIntegration, Metadata, Playbook,
    PlaybookId, PolicySet, Scope,
};
pub use prompt::{BuiltPrompt, PromptLayer, PromptLayers};
pub use query::ResolveQuery;
pub use registry::{PlaybookRegistry, REGISTRY_VERSION, RegistryEntry};
