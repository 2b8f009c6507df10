//! # Briefer
//!
//! Playbook-driven prompt briefing for AI coding agents.
//!
//! Briefer selects the best-matching playbook for a task, gathers supporting
//! playbooks by scope, optionally augments them with externally retrieved
//! context, and assembles everything into a single layered prompt.
//!
//! ## Features
//!
//! - YAML playbook catalogs loaded from a workspace directory
//! - Deterministic weighted scoring to resolve the best playbook for a task
//! - Six-layer prompt composition with a fixed section order
//! - Knowledge augmentation through a pluggable retrieval capability with a
//!   command-line fallback, degrading gracefully when retrieval fails
//!
//! ## Example
//!
//! ```rust
//! use briefer::models::ResolveQuery;
//! use briefer::resolver::resolve;
//!
//! let playbooks = Vec::new();
//! let query = ResolveQuery::new().with_task("fix broken imports");
//! assert!(resolve(&playbooks, &query).is_none());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod composer;
pub mod config;
pub mod knowledge;
pub mod loader;
pub mod models;
pub mod observability;
pub mod resolver;
pub mod services;
pub mod setup;

// Re-exports for convenience
pub use composer::{SupportingPlaybooks, compose, estimate_tokens};
pub use config::BrieferConfig;
pub use knowledge::{
    Augmenter, CommandKnowledgeSource, KnowledgeChunk, KnowledgeOutcome, KnowledgeRequest,
    KnowledgeResult, KnowledgeSource,
};
pub use loader::{build_registry, load_catalog};
pub use models::{
    BuiltPrompt, KnowledgeIntegration, Playbook, PlaybookId, PromptLayer, PromptLayers,
    ResolveQuery, Scope,
};
pub use resolver::{ScoredMatch, filter_by_scope, resolve, resolve_layers};
pub use services::{BriefOptions, BriefingService};

/// Error type for briefer operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing resolve discriminators, playbook validation failures, malformed knowledge responses |
/// | `OperationFailed` | Filesystem I/O errors, YAML/TOML parse failures, knowledge command launch failures |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A resolve request carries no discriminator at all
    /// - A playbook file is missing `id`, or its `priority` is outside [1,5]
    /// - A knowledge command response is not the expected JSON shape
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Playbook files or the config file cannot be read
    /// - Scaffolding cannot write the starter workspace
    /// - The external knowledge command cannot be spawned
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for briefer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "load_playbook".to_string(),
            cause: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'load_playbook' failed: file not found"
        );
    }
}
