//! Integration tests for briefer.
//!
//! These tests exercise the full pipeline: scaffolding a playbooks
//! workspace, loading the catalog, resolving the best playbook, and
//! composing layered prompts with and without knowledge augmentation.

#![allow(
    clippy::panic,
    clippy::too_many_lines,
    clippy::unwrap_used,
    clippy::expect_used
)]

use briefer::Error;

#[test]
fn test_error_types() {
    // Test InvalidInput error
    let err = Error::InvalidInput("test message".to_string());
    let display = format!("{err}");
    assert!(display.contains("invalid input"));
    assert!(display.contains("test message"));

    // Test OperationFailed error
    let err = Error::OperationFailed {
        operation: "load_playbook".to_string(),
        cause: "file not found".to_string(),
    };
    let display = format!("{err}");
    assert!(display.contains("load_playbook"));
    assert!(display.contains("file not found"));
}

/// Workspace lifecycle tests: scaffold, load, and index a playbooks
/// directory end to end.
mod workspace_lifecycle_tests {
    use briefer::models::{REGISTRY_VERSION, Scope};
    use briefer::{loader, setup};

    #[test]
    fn test_init_then_load_catalog() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");

        let report = setup::init(&playbooks_dir, false).expect("init should succeed");
        // Every starter playbook plus the README
        assert_eq!(report.created.len(), setup::STARTER_PLAYBOOKS.len() + 1);
        assert!(report.skipped.is_empty());

        let catalog = loader::load_catalog(&playbooks_dir).expect("catalog should load");
        assert_eq!(catalog.len(), setup::STARTER_PLAYBOOKS.len());

        let ids: Vec<&str> = catalog.iter().map(|pb| pb.id.as_str()).collect();
        for expected in [
            "system.base-directives",
            "task.fix-imports",
            "task.debug-failure",
            "domain.refactoring",
            "domain.testing",
            "policy.security",
            "package.example-service",
        ] {
            assert!(ids.contains(&expected), "missing starter playbook {expected}");
        }
    }

    #[test]
    fn test_init_skips_existing_files_without_force() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");

        setup::init(&playbooks_dir, false).expect("first init should succeed");
        let second = setup::init(&playbooks_dir, false).expect("second init should succeed");

        assert!(second.created.is_empty());
        assert_eq!(second.skipped.len(), setup::STARTER_PLAYBOOKS.len() + 1);
    }

    #[test]
    fn test_load_catalog_skips_invalid_playbook() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");
        setup::init(&playbooks_dir, false).expect("init should succeed");

        let broken = playbooks_dir.join("tasks/broken.yml");
        std::fs::write(
            &broken,
            "id: \"task.broken\"\nscope: \"task\"\npriority: 9\ndescription: \"Broken.\"\n",
        )
        .expect("write should succeed");

        // The file itself fails validation
        let err = loader::load_playbook(&broken).unwrap_err();
        assert!(format!("{err}").contains("priority must be between"));

        // The catalog load skips it instead of failing
        let catalog = loader::load_catalog(&playbooks_dir).expect("catalog should load");
        assert_eq!(catalog.len(), setup::STARTER_PLAYBOOKS.len());
        assert!(!catalog.iter().any(|pb| pb.id.as_str() == "task.broken"));
    }

    #[test]
    fn test_build_registry_covers_catalog() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");
        setup::init(&playbooks_dir, false).expect("init should succeed");

        let registry = loader::build_registry(&playbooks_dir).expect("registry should build");

        assert_eq!(registry.version, REGISTRY_VERSION);
        assert_eq!(registry.len(), setup::STARTER_PLAYBOOKS.len());
        for entry in &registry.playbooks {
            assert!(!entry.file_path.is_empty());
        }

        let scopes: Vec<Scope> = registry.playbooks.iter().map(|e| e.scope).collect();
        assert!(scopes.contains(&Scope::System));
        assert!(scopes.contains(&Scope::Task));
        assert!(scopes.contains(&Scope::Domain));
        assert!(scopes.contains(&Scope::Policy));
        assert!(scopes.contains(&Scope::Package));
    }
}

/// Resolution tests over the starter catalog.
mod resolution_tests {
    use briefer::models::{Playbook, ResolveQuery};
    use briefer::{loader, resolver, setup};
    use std::path::PathBuf;

    fn starter_catalog() -> (tempfile::TempDir, PathBuf, Vec<Playbook>) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");
        setup::init(&playbooks_dir, false).expect("init should succeed");
        let catalog = loader::load_catalog(&playbooks_dir).expect("catalog should load");
        (temp_dir, playbooks_dir, catalog)
    }

    #[test]
    fn test_resolve_task_query_picks_fix_imports() {
        let (_guard, _dir, catalog) = starter_catalog();
        let query = ResolveQuery::new().with_task("fix broken imports");

        let best = resolver::resolve(&catalog, &query).expect("should resolve");
        assert_eq!(best.playbook.id.as_str(), "task.fix-imports");
        // Description match + "imports" tag + priority boost
        assert_eq!(best.score, 21);
        assert_eq!(best.reason, "score 21 (priority 3)");
    }

    #[test]
    fn test_resolve_error_pattern_matches_description() {
        let (_guard, _dir, catalog) = starter_catalog();
        let query = ResolveQuery::new().with_error_pattern("broken imports");

        let best = resolver::resolve(&catalog, &query).expect("should resolve");
        assert_eq!(best.playbook.id.as_str(), "task.fix-imports");
        assert_eq!(best.score, 18);
    }

    #[test]
    fn test_resolve_domain_query_picks_domain_playbook() {
        let (_guard, _dir, catalog) = starter_catalog();
        let query = ResolveQuery::new().with_domain("refactoring");

        let best = resolver::resolve(&catalog, &query).expect("should resolve");
        assert_eq!(best.playbook.id.as_str(), "domain.refactoring");
        // Domain match + priority boost
        assert_eq!(best.score, 24);
    }

    #[test]
    fn test_resolve_package_query_picks_package_playbook() {
        let (_guard, _dir, catalog) = starter_catalog();
        let query = ResolveQuery::new().with_package("example-service");

        let best = resolver::resolve(&catalog, &query).expect("should resolve");
        assert_eq!(best.playbook.id.as_str(), "package.example-service");
        assert_eq!(best.score, 19);
    }

    #[test]
    fn test_resolve_layers_orders_by_score() {
        let (_guard, _dir, catalog) = starter_catalog();
        let query = ResolveQuery::new().with_task("fix broken imports");

        let layers = resolver::resolve_layers(&catalog, &query);
        assert_eq!(layers.len(), catalog.len());
        for pair in layers.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(layers[0].playbook.id.as_str(), "task.fix-imports");
    }

    #[test]
    fn test_resolve_empty_catalog_returns_none() {
        let query = ResolveQuery::new().with_task("anything");
        assert!(resolver::resolve(&[], &query).is_none());
    }
}

/// Full briefing pipeline tests: resolve, augment, and compose.
mod briefing_pipeline_tests {
    use async_trait::async_trait;
    use briefer::models::Playbook;
    use briefer::{
        BriefOptions, BrieferConfig, BriefingService, KnowledgeChunk, KnowledgeRequest,
        KnowledgeResult, KnowledgeSource, Result, estimate_tokens, loader, setup,
    };
    use std::sync::{Arc, Mutex};

    /// Source that returns a fixed chunk and records every query text.
    struct RecordingSource {
        seen: Mutex<Vec<String>>,
    }

    impl RecordingSource {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl KnowledgeSource for RecordingSource {
        async fn query(&self, request: &KnowledgeRequest) -> Result<KnowledgeResult> {
            self.seen.lock().unwrap().push(request.text.clone());
            Ok(KnowledgeResult {
                chunks: vec![KnowledgeChunk {
                    text: "Import fixes live in the resolver module.".to_string(),
                    source_path: "src/resolver.rs".to_string(),
                    relevance_score: 0.9,
                    metadata: None,
                }],
                context_text: Some(
                    "// src/resolver.rs\nImport fixes live in the resolver module.".to_string(),
                ),
            })
        }
    }

    fn starter_catalog(temp_dir: &tempfile::TempDir) -> Vec<Playbook> {
        let playbooks_dir = temp_dir.path().join("playbooks");
        setup::init(&playbooks_dir, false).expect("init should succeed");
        loader::load_catalog(&playbooks_dir).expect("catalog should load")
    }

    #[tokio::test]
    async fn test_brief_composes_all_layers_without_knowledge() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let catalog = starter_catalog(&temp_dir);

        let service = BriefingService::new(BrieferConfig::default());
        let options = BriefOptions::new()
            .with_package_name("example-service")
            .with_skip_knowledge(true);

        let prompt = service
            .brief("fix broken imports", &catalog, &options)
            .await
            .expect("brief should succeed")
            .expect("a playbook should match");

        // Main playbook layer
        assert!(prompt.full_prompt.contains("# Task: task.fix-imports"));
        assert!(prompt.full_prompt.contains("## Validation Checks:"));
        assert!(prompt.full_prompt.contains("- [no-circular-deps]"));

        // Supporting layers from the starter catalog
        assert!(prompt.full_prompt.contains("# Behavioral Policies"));
        assert!(prompt.full_prompt.contains("✅ File writing: ALLOWED"));
        assert!(
            prompt
                .full_prompt
                .contains("## Package: package.example-service")
        );
        assert!(prompt.full_prompt.contains("# Domain Strategies"));

        // Knowledge was skipped, so no context layer
        assert!(prompt.layers.context.is_empty());
        assert!(!prompt.full_prompt.contains("# Relevant Context"));

        assert_eq!(prompt.token_count, estimate_tokens(&prompt.full_prompt));
    }

    #[tokio::test]
    async fn test_brief_injects_retrieved_context() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let catalog = starter_catalog(&temp_dir);

        let source = Arc::new(RecordingSource::new());
        let service = BriefingService::new(BrieferConfig::default())
            .with_knowledge_source(source.clone());
        let options = BriefOptions::new().with_package_name("engine");

        let prompt = service
            .brief("fix broken imports", &catalog, &options)
            .await
            .expect("brief should succeed")
            .expect("a playbook should match");

        assert!(prompt.full_prompt.contains("# Relevant Context"));
        assert!(prompt.layers.context.contains("// src/resolver.rs"));
        assert!(
            prompt
                .layers
                .context
                .contains("Import fixes live in the resolver module.")
        );

        // Query templates are interpolated before dispatch
        let seen = source.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().any(|q| q.contains("imports organized in engine")));
    }

    #[tokio::test]
    async fn test_brief_returns_none_for_empty_catalog() {
        let service = BriefingService::new(BrieferConfig::default());
        let options = BriefOptions::new();

        let result = service
            .brief("fix broken imports", &[], &options)
            .await
            .expect("brief should succeed");
        assert!(result.is_none());
    }
}

/// Graceful degradation tests: retrieval failures never abort briefing.
mod graceful_degradation_tests {
    use async_trait::async_trait;
    use briefer::{
        BriefOptions, BrieferConfig, BriefingService, Error, KnowledgeRequest, KnowledgeResult,
        KnowledgeSource, Result, loader, setup,
    };
    use std::sync::Arc;

    /// Source that fails every query.
    struct FailingSource;

    #[async_trait]
    impl KnowledgeSource for FailingSource {
        async fn query(&self, _request: &KnowledgeRequest) -> Result<KnowledgeResult> {
            Err(Error::OperationFailed {
                operation: "knowledge_query".to_string(),
                cause: "source offline".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_brief_survives_failing_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");
        setup::init(&playbooks_dir, false).expect("init should succeed");
        let catalog = loader::load_catalog(&playbooks_dir).expect("catalog should load");

        let service = BriefingService::new(BrieferConfig::default())
            .with_knowledge_source(Arc::new(FailingSource));
        let options = BriefOptions::new();

        let prompt = service
            .brief("fix broken imports", &catalog, &options)
            .await
            .expect("brief should degrade, not fail")
            .expect("a playbook should match");

        assert!(prompt.layers.context.is_empty());
        assert!(prompt.full_prompt.contains("# Task: task.fix-imports"));
    }

    #[tokio::test]
    async fn test_brief_survives_missing_fallback_command() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let playbooks_dir = temp_dir.path().join("playbooks");
        setup::init(&playbooks_dir, false).expect("init should succeed");
        let catalog = loader::load_catalog(&playbooks_dir).expect("catalog should load");

        // No injected source, and a fallback command that cannot exist
        let config = BrieferConfig::default()
            .with_knowledge_command("/nonexistent/briefer-kb-test", Vec::new());
        let service = BriefingService::new(config);
        let options = BriefOptions::new();

        let prompt = service
            .brief("fix broken imports", &catalog, &options)
            .await
            .expect("brief should degrade, not fail")
            .expect("a playbook should match");

        assert!(prompt.layers.context.is_empty());
        assert!(prompt.full_prompt.contains("# Task: task.fix-imports"));
    }
}
