//! Playbook types and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a playbook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybookId(String);

impl PlaybookId {
    /// Creates a new playbook ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID contains the given fragment.
    ///
    /// Used for package and domain discriminator matching, which tests id
    /// containment rather than equality.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }

    /// Returns true if the ID is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlaybookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlaybookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlaybookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Playbook scope.
///
/// The scope classifies a playbook and determines which composition layer it
/// may feed. It is immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Base directives applying to every operation.
    System,
    /// Instructions specific to one package.
    Package,
    /// Cross-cutting strategies for a problem domain.
    Domain,
    /// A concrete task recipe.
    Task,
    /// Behavioral constraints and restrictions.
    Policy,
}

impl Scope {
    /// Returns the scope as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Package => "package",
            Self::Domain => "domain",
            Self::Task => "task",
            Self::Policy => "policy",
        }
    }

    /// Parses a scope string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "system" => Some(Self::System),
            "package" => Some(Self::Package),
            "domain" => Some(Self::Domain),
            "task" => Some(Self::Task),
            "policy" => Some(Self::Policy),
            _ => None,
        }
    }

    /// Returns all scopes.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::System,
            Self::Package,
            Self::Domain,
            Self::Task,
            Self::Policy,
        ]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playbook authorship and classification metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    /// Author of the playbook.
    pub author: String,
    /// Tags for matching and display.
    pub tags: Vec<String>,
    /// Last update date (informational, not parsed).
    pub last_updated: String,
}

/// A validation check attached to a playbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Check identifier.
    pub id: String,
    /// Human-readable description of what must hold.
    pub description: String,
}

/// Behavioral policy constraints for a playbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySet {
    /// Whether file writes are permitted.
    pub allow_write: bool,
    /// Whether file deletion is permitted.
    pub allow_delete: bool,
    /// Path globs the agent must not touch.
    pub restricted_paths: Vec<String>,
    /// Actions the agent must never take.
    pub forbidden_actions: Vec<String>,
}

/// Default context token budget when a playbook does not set one.
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 2000;

const fn default_max_context_tokens() -> usize {
    DEFAULT_MAX_CONTEXT_TOKENS
}

/// Knowledge augmentation configuration for a playbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeIntegration {
    /// Whether knowledge augmentation runs for this playbook.
    pub enabled: bool,
    /// Query templates; `{placeholder}` tokens are interpolated per request.
    pub queries: Vec<String>,
    /// Token budget for the merged context text.
    pub max_context_tokens: usize,
}

impl Default for KnowledgeIntegration {
    fn default() -> Self {
        Self {
            enabled: false,
            queries: Vec::new(),
            max_context_tokens: default_max_context_tokens(),
        }
    }
}

/// An example task with its expected execution steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    /// Example task text.
    pub task: String,
    /// Ordered steps a correct execution takes.
    pub expected_steps: Vec<String>,
}

/// A declarative instructional unit briefing an AI coding agent.
///
/// Playbooks are loaded once per invocation and treated as immutable inputs;
/// the resolver and composer never mutate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playbook {
    /// Unique identifier within a catalog.
    pub id: PlaybookId,
    /// Playbook format version (informational).
    #[serde(default)]
    pub version: String,
    /// Scope, determining the composition layer this playbook may feed.
    pub scope: Scope,
    /// Priority in [1,5]; higher means more specific.
    pub priority: u8,
    /// Authorship and tags.
    #[serde(default)]
    pub metadata: Metadata,
    /// What this playbook is for.
    #[serde(default)]
    pub description: String,
    /// Ordered strategies the agent should follow.
    #[serde(default)]
    pub strategies: Vec<String>,
    /// Validation checks to run after the task.
    #[serde(default)]
    pub checks: Vec<Check>,
    /// Behavioral policy constraints.
    #[serde(default)]
    pub policies: PolicySet,
    /// Knowledge augmentation configuration.
    #[serde(default, rename = "knowledgeIntegration")]
    pub knowledge: KnowledgeIntegration,
    /// Worked examples.
    #[serde(default)]
    pub examples: Vec<Example>,
}

impl Playbook {
    /// Creates a minimal playbook for the given id, scope, and priority.
    ///
    /// All other fields start empty; primarily useful in tests and as a
    /// builder seed.
    #[must_use]
    pub fn new(id: impl Into<PlaybookId>, scope: Scope, priority: u8) -> Self {
        Self {
            id: id.into(),
            version: String::new(),
            scope,
            priority,
            metadata: Metadata::default(),
            description: String::new(),
            strategies: Vec::new(),
            checks: Vec::new(),
            policies: PolicySet::default(),
            knowledge: KnowledgeIntegration::default(),
            examples: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.metadata.tags = tags;
        self
    }

    /// Sets the strategies.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<String>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets the policy constraints.
    #[must_use]
    pub fn with_policies(mut self, policies: PolicySet) -> Self {
        self.policies = policies;
        self
    }

    /// Sets the knowledge integration block.
    #[must_use]
    pub fn with_knowledge(mut self, knowledge: KnowledgeIntegration) -> Self {
        self.knowledge = knowledge;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playbook_id_preserves_string() {
        let id = PlaybookId::new("task.fix-imports");
        assert_eq!(id.as_str(), "task.fix-imports");
        assert_eq!(id.to_string(), "task.fix-imports");
        assert!(id.contains("fix-imports"));
        assert!(!id.contains("refactor"));
    }

    #[test]
    fn test_scope_parse_roundtrip() {
        for scope in Scope::all() {
            assert_eq!(Scope::parse(scope.as_str()), Some(scope));
        }
        assert_eq!(Scope::parse("TASK"), Some(Scope::Task));
        assert_eq!(Scope::parse("unknown"), None);
    }

    #[test]
    fn test_minimal_yaml_playbook() {
        let yaml = r#"
id: "task.sample"
scope: "task"
priority: 3
"#;
        let playbook: Playbook = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(playbook.id.as_str(), "task.sample");
        assert_eq!(playbook.scope, Scope::Task);
        assert_eq!(playbook.priority, 3);
        assert!(playbook.strategies.is_empty());
        assert!(!playbook.knowledge.enabled);
        assert_eq!(
            playbook.knowledge.max_context_tokens,
            DEFAULT_MAX_CONTEXT_TOKENS
        );
    }

    #[test]
    fn test_full_yaml_playbook() {
        let yaml = r#"
id: "task.fix-imports"
version: "1.0.0"
scope: "task"
priority: 3
metadata:
  author: "team"
  tags: ["refactoring", "imports"]
  lastUpdated: "2025-12-04"
description: "Fix broken imports in a package."
strategies:
  - "Scan for broken imports"
  - "Update import statements"
checks:
  - id: "no-broken-imports"
    description: "All imports must resolve"
policies:
  allowWrite: true
  allowDelete: false
  restrictedPaths:
    - "core/"
  forbiddenActions:
    - "Commit secrets"
knowledgeIntegration:
  enabled: true
  queries:
    - "Where are similar import fixes implemented?"
  maxContextTokens: 1500
examples:
  - task: "Fix imports in utils"
    expectedSteps:
      - "Scan utils"
      - "Apply fixes"
"#;
        let playbook: Playbook = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(playbook.metadata.tags.len(), 2);
        assert_eq!(playbook.metadata.last_updated, "2025-12-04");
        assert!(playbook.policies.allow_write);
        assert!(!playbook.policies.allow_delete);
        assert_eq!(playbook.policies.restricted_paths, vec!["core/"]);
        assert!(playbook.knowledge.enabled);
        assert_eq!(playbook.knowledge.max_context_tokens, 1500);
        assert_eq!(playbook.checks.len(), 1);
        assert_eq!(playbook.examples[0].expected_steps.len(), 2);
    }

    #[test]
    fn test_playbook_builder() {
        let playbook = Playbook::new("domain.testing", Scope::Domain, 2)
            .with_description("Testing strategies")
            .with_tags(vec!["testing".to_string()])
            .with_strategies(vec!["Write unit tests".to_string()]);

        assert_eq!(playbook.scope, Scope::Domain);
        assert_eq!(playbook.metadata.tags, vec!["testing"]);
        assert_eq!(playbook.strategies.len(), 1);
    }
}
