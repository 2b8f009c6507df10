//! Briefing orchestration service.
//!
//! Ties resolution, knowledge augmentation, and composition into the one
//! call a host (CLI or embedding application) makes per task.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Result;
use crate::composer::{self, SupportingPlaybooks};
use crate::config::BrieferConfig;
use crate::knowledge::{Augmenter, CommandKnowledgeSource, KnowledgeSource};
use crate::models::{BuiltPrompt, Playbook, ResolveQuery, Scope};
use crate::resolver;

/// Options for a single briefing run.
#[derive(Debug, Clone, Default)]
pub struct BriefOptions {
    /// Package the task targets, if known. Drives the package-match score
    /// bonus and the package-instructions layer.
    pub package_name: Option<String>,
    /// Skips knowledge augmentation entirely (offline runs, tests).
    pub skip_knowledge: bool,
}

impl BriefOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target package name.
    #[must_use]
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Enables or disables the knowledge stage.
    #[must_use]
    pub const fn with_skip_knowledge(mut self, skip: bool) -> Self {
        self.skip_knowledge = skip;
        self
    }
}

/// Service that turns a task description into a full agent briefing.
pub struct BriefingService {
    /// Configuration (playbooks dir, knowledge command).
    config: BrieferConfig,
    /// Injected retrieval capability; the configured external command is
    /// used when absent.
    knowledge_source: Option<Arc<dyn KnowledgeSource>>,
}

impl BriefingService {
    /// Creates a new briefing service.
    #[must_use]
    pub const fn new(config: BrieferConfig) -> Self {
        Self {
            config,
            knowledge_source: None,
        }
    }

    /// Injects a retrieval capability, replacing the command fallback.
    #[must_use]
    pub fn with_knowledge_source(mut self, source: Arc<dyn KnowledgeSource>) -> Self {
        self.knowledge_source = Some(source);
        self
    }

    /// Returns the service configuration.
    #[must_use]
    pub const fn config(&self) -> &BrieferConfig {
        &self.config
    }

    /// Builds the full briefing prompt for a task.
    ///
    /// Resolves the main playbook from the catalog, gathers supporting
    /// playbooks (system scope, domain scope, and package playbooks whose id
    /// contains the package name), runs knowledge augmentation for the main
    /// playbook, and composes the layered prompt.
    ///
    /// Returns `Ok(None)` when no playbook matches the task. Knowledge
    /// failures never fail the briefing; the prompt is composed without a
    /// context layer instead.
    ///
    /// # Errors
    ///
    /// Currently infallible beyond the `Result` plumbing; the signature
    /// leaves room for catalog-level failures.
    pub async fn brief(
        &self,
        task: &str,
        playbooks: &[Playbook],
        options: &BriefOptions,
    ) -> Result<Option<BuiltPrompt>> {
        let mut query = ResolveQuery::new().with_task(task);
        if let Some(name) = &options.package_name {
            query = query.with_package(name.clone());
        }

        let Some(matched) = resolver::resolve(playbooks, &query) else {
            return Ok(None);
        };
        let main = matched.playbook;

        tracing::debug!(
            playbook = %main.id,
            score = matched.score,
            "Resolved main playbook"
        );

        let supporting = SupportingPlaybooks {
            system: resolver::filter_by_scope(playbooks, Scope::System),
            package: options
                .package_name
                .as_deref()
                .map_or_else(Vec::new, |name| {
                    playbooks.iter().filter(|p| p.id.contains(name)).collect()
                }),
            domain: resolver::filter_by_scope(playbooks, Scope::Domain),
        };

        let context_text = if options.skip_knowledge || !main.knowledge.enabled {
            None
        } else {
            self.gather_context(main, task, options.package_name.as_deref())
                .await
        };

        Ok(Some(composer::compose(
            main,
            &supporting,
            context_text.as_deref(),
        )))
    }

    /// Runs knowledge augmentation, degrading to no context on failure.
    async fn gather_context(
        &self,
        playbook: &Playbook,
        task: &str,
        package_name: Option<&str>,
    ) -> Option<String> {
        let mut context = HashMap::new();
        context.insert("task".to_string(), task.to_string());
        if let Some(name) = package_name {
            context.insert("package".to_string(), name.to_string());
        }

        let fallback = CommandKnowledgeSource::new(
            self.config.knowledge.program.clone(),
            self.config.knowledge.args.clone(),
        );
        let mut augmenter = Augmenter::new(fallback);
        if let Some(source) = &self.knowledge_source {
            augmenter = augmenter.with_source(Arc::clone(source));
        }

        match augmenter.augment(&playbook.knowledge, &context).await {
            Ok(outcome) => {
                if outcome.context.is_empty() {
                    None
                } else {
                    Some(outcome.context)
                }
            }
            Err(e) => {
                tracing::warn!(
                    playbook = %playbook.id,
                    error = %e,
                    "Knowledge augmentation failed, composing prompt without context"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{KnowledgeChunk, KnowledgeRequest, KnowledgeResult};
    use crate::models::{KnowledgeIntegration, PromptLayer};
    use async_trait::async_trait;

    struct FixedSource {
        result: Option<KnowledgeResult>,
    }

    #[async_trait]
    impl KnowledgeSource for FixedSource {
        async fn query(&self, _request: &KnowledgeRequest) -> Result<KnowledgeResult> {
            self.result
                .clone()
                .ok_or_else(|| crate::Error::OperationFailed {
                    operation: "query".to_string(),
                    cause: "source offline".to_string(),
                })
        }
    }

    fn catalog() -> Vec<Playbook> {
        vec![
            Playbook::new("system.base", Scope::System, 1)
                .with_description("Base directives")
                .with_strategies(vec!["Verify before modifying".to_string()]),
            Playbook::new("task.fix-imports", Scope::Task, 3)
                .with_description("Fix broken imports in a package")
                .with_strategies(vec!["Scan for broken imports".to_string()]),
            Playbook::new("domain.refactoring", Scope::Domain, 2)
                .with_description("Refactoring strategies")
                .with_strategies(vec!["Identify code smells".to_string()]),
            Playbook::new("package.engine", Scope::Package, 2)
                .with_description("Engine package guidance")
                .with_strategies(vec!["Run benchmarks".to_string()]),
        ]
    }

    #[tokio::test]
    async fn test_brief_no_match_returns_none() {
        let service = BriefingService::new(BrieferConfig::default());
        let result = service
            .brief("completely unrelated query", &[], &BriefOptions::new())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_brief_composes_layers() {
        let service = BriefingService::new(BrieferConfig::default());
        let prompt = service
            .brief("fix broken imports", &catalog(), &BriefOptions::new())
            .await
            .unwrap()
            .unwrap();

        assert!(prompt.full_prompt.contains("# Task: task.fix-imports"));
        assert!(prompt.full_prompt.contains("Base directives"));
        assert!(prompt.full_prompt.contains("# Domain Strategies"));
        // No package name given, so no package layer.
        assert!(prompt.layers.get(PromptLayer::PackageInstructions).is_empty());
        assert!(prompt.layers.get(PromptLayer::Context).is_empty());
    }

    #[tokio::test]
    async fn test_brief_package_layer_by_id_containment() {
        let service = BriefingService::new(BrieferConfig::default());
        let prompt = service
            .brief(
                "fix broken imports",
                &catalog(),
                &BriefOptions::new().with_package_name("engine"),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(prompt.full_prompt.contains("## Package: package.engine"));
    }

    #[tokio::test]
    async fn test_brief_injects_knowledge_context() {
        let mut playbooks = catalog();
        playbooks[1] = playbooks[1].clone().with_knowledge(KnowledgeIntegration {
            enabled: true,
            queries: vec!["imports in {package}".to_string()],
            max_context_tokens: 500,
        });

        let source = Arc::new(FixedSource {
            result: Some(KnowledgeResult {
                chunks: vec![KnowledgeChunk {
                    text: "import map".to_string(),
                    source_path: "src/imports.rs".to_string(),
                    relevance_score: 0.9,
                    metadata: None,
                }],
                context_text: Some("// src/imports.rs\nimport map".to_string()),
            }),
        });

        let service =
            BriefingService::new(BrieferConfig::default()).with_knowledge_source(source);
        let prompt = service
            .brief(
                "fix broken imports",
                &playbooks,
                &BriefOptions::new().with_package_name("engine"),
            )
            .await
            .unwrap()
            .unwrap();

        let context = prompt.layers.get(PromptLayer::Context);
        assert!(context.starts_with("# Relevant Context"));
        assert!(context.contains("import map"));
    }

    #[tokio::test]
    async fn test_brief_degrades_when_knowledge_fails() {
        let mut playbooks = catalog();
        playbooks[1] = playbooks[1].clone().with_knowledge(KnowledgeIntegration {
            enabled: true,
            queries: vec!["anything".to_string()],
            max_context_tokens: 500,
        });

        let source = Arc::new(FixedSource { result: None });
        let service =
            BriefingService::new(BrieferConfig::default()).with_knowledge_source(source);
        let prompt = service
            .brief("fix broken imports", &playbooks, &BriefOptions::new())
            .await
            .unwrap()
            .unwrap();

        assert!(prompt.layers.get(PromptLayer::Context).is_empty());
        assert!(prompt.full_prompt.contains("# Task: task.fix-imports"));
    }

    #[tokio::test]
    async fn test_brief_skip_knowledge_never_queries() {
        let mut playbooks = catalog();
        playbooks[1] = playbooks[1].clone().with_knowledge(KnowledgeIntegration {
            enabled: true,
            queries: vec!["anything".to_string()],
            max_context_tokens: 500,
        });

        // A failing source would degrade anyway; the point is that skip
        // short-circuits before the augmenter is even built.
        let source = Arc::new(FixedSource { result: None });
        let service =
            BriefingService::new(BrieferConfig::default()).with_knowledge_source(source);
        let prompt = service
            .brief(
                "fix broken imports",
                &playbooks,
                &BriefOptions::new().with_skip_knowledge(true),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(prompt.layers.get(PromptLayer::Context).is_empty());
    }
}
