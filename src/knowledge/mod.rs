//! Knowledge augmentation.
//!
//! Retrieves external context for a playbook before composition. A playbook
//! declares query templates; each is interpolated, dispatched concurrently
//! to a [`KnowledgeSource`], and the successful results are merged,
//! deduplicated, and truncated to the playbook's token budget.
//!
//! Retrieval itself is never implemented here. The capability boundary is
//! the [`KnowledgeSource`] trait; when no source is injected, queries fall
//! back to an external command ([`CommandKnowledgeSource`]). Failures
//! degrade: a failed query is excluded from the merge, and only when every
//! query fails does augmentation report an error, which the briefing
//! pipeline downgrades to an empty context.

mod command;

pub use command::CommandKnowledgeSource;

use crate::models::{DEFAULT_MAX_CONTEXT_TOKENS, KnowledgeIntegration};
use crate::{Error, Result};
use async_trait::async_trait;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

/// Separator between merged context fragments.
pub const MERGE_SEPARATOR: &str = "\n\n---\n\n";

/// Marker appended when context is truncated to the token budget.
pub const TRUNCATION_MARKER: &str = "\n// ... (truncated)";

/// Failure reason reported when no query succeeds.
pub const ALL_QUERIES_FAILED: &str = "all knowledge queries failed";

/// Regex for `{placeholder}` tokens in query templates.
// Allow expect() on static regex patterns - these are guaranteed to compile
#[allow(clippy::expect_used)]
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("static regex: placeholder"));

/// Retrieval intent understood by knowledge sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Summarize matching material.
    Summary,
    /// Find material similar to the text.
    Similar,
    /// Locate where something lives.
    Nav,
    /// Free-text search.
    Search,
}

/// Result filters for a knowledge request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeFilters {
    /// Restrict results to these path prefixes.
    pub paths: Vec<String>,
    /// Restrict results to these tags.
    pub tags: Vec<String>,
    /// Restrict results to these MIME types.
    pub mime_types: Vec<String>,
}

/// A retrieval request issued to a knowledge source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeRequest {
    /// Product or domain the query belongs to.
    pub domain_tag: String,
    /// Retrieval intent.
    pub intent: Intent,
    /// Index scope to search.
    pub scope_id: String,
    /// Query text.
    pub text: String,
    /// Maximum number of chunks to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Optional result filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<KnowledgeFilters>,
}

/// One retrieved chunk of context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeChunk {
    /// Chunk text.
    pub text: String,
    /// Path of the source the chunk came from.
    pub source_path: String,
    /// Relevance score assigned by the source.
    pub relevance_score: f64,
    /// Source-specific metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Result returned by a knowledge source for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeResult {
    /// Retrieved chunks.
    pub chunks: Vec<KnowledgeChunk>,
    /// Pre-rendered context text, when the source provides one.
    pub context_text: Option<String>,
}

/// A retrieval capability that answers knowledge requests.
///
/// Implementations own their own retries, timeouts, and transport. A failed
/// query returns an error; the augmenter treats it as that query failing and
/// never aborts sibling queries.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Answers one knowledge request.
    ///
    /// # Errors
    ///
    /// Returns an error when retrieval fails.
    async fn query(&self, request: &KnowledgeRequest) -> Result<KnowledgeResult>;
}

/// Merged product of knowledge augmentation across all queries.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeOutcome {
    /// Merged, truncated context text.
    pub context: String,
    /// Chunks across all successful queries, deduplicated by source path.
    pub chunks: Vec<KnowledgeChunk>,
}

/// Runs knowledge augmentation for playbooks.
///
/// Dispatches to the injected [`KnowledgeSource`] when present, otherwise to
/// the command-line fallback. Absence of the capability is explicit; there
/// are no runtime shape checks.
pub struct Augmenter {
    source: Option<Arc<dyn KnowledgeSource>>,
    fallback: CommandKnowledgeSource,
}

impl Augmenter {
    /// Creates an augmenter that uses the command fallback for every query.
    #[must_use]
    pub const fn new(fallback: CommandKnowledgeSource) -> Self {
        Self {
            source: None,
            fallback,
        }
    }

    /// Injects a knowledge source, taking precedence over the fallback.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn KnowledgeSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Runs augmentation for one playbook's integration block.
    ///
    /// A disabled integration is a successful no-op. Enabled integrations
    /// interpolate every query template, fan out one task per query, and
    /// merge the successes in original template order.
    ///
    /// # Errors
    ///
    /// Returns an error only when every query fails (including the case of
    /// an enabled integration with no query templates).
    pub async fn augment(
        &self,
        integration: &KnowledgeIntegration,
        context: &HashMap<String, String>,
    ) -> Result<KnowledgeOutcome> {
        if !integration.enabled {
            return Ok(KnowledgeOutcome::default());
        }

        let budget = effective_budget(integration.max_context_tokens);
        let queries: Vec<String> = integration
            .queries
            .iter()
            .map(|template| interpolate_template(template, context))
            .collect();

        let handles: Vec<tokio::task::JoinHandle<Result<QueryResponse>>> = queries
            .into_iter()
            .map(|text| {
                let source = self.source.clone();
                let fallback = self.fallback.clone();
                tokio::spawn(async move { run_query(source, &fallback, text, budget).await })
            })
            .collect();

        // Join in spawn order so the merge is ordered by template index,
        // never by completion order.
        let mut responses = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Ok(response)) => responses.push(response),
                Ok(Err(e)) => {
                    tracing::debug!(error = %e, "knowledge query failed");
                },
                Err(e) => {
                    tracing::debug!(error = %e, "knowledge query task did not complete");
                },
            }
        }

        if responses.is_empty() {
            return Err(Error::OperationFailed {
                operation: "knowledge_augmentation".to_string(),
                cause: ALL_QUERIES_FAILED.to_string(),
            });
        }

        Ok(merge_responses(responses, budget))
    }
}

/// Per-query result retained for the merge.
#[derive(Debug)]
struct QueryResponse {
    context: String,
    chunks: Vec<KnowledgeChunk>,
}

async fn run_query(
    source: Option<Arc<dyn KnowledgeSource>>,
    fallback: &CommandKnowledgeSource,
    text: String,
    budget: usize,
) -> Result<QueryResponse> {
    let request = KnowledgeRequest {
        domain_tag: "playbooks".to_string(),
        intent: Intent::Search,
        scope_id: "default".to_string(),
        text,
        limit: Some(budget.div_ceil(100)),
        filters: None,
    };

    let result = match source {
        Some(source) => source.query(&request).await?,
        None => fallback.query(&request).await?,
    };

    Ok(QueryResponse {
        context: truncate_to_budget(result.context_text.unwrap_or_default(), budget),
        chunks: result.chunks,
    })
}

fn merge_responses(responses: Vec<QueryResponse>, budget: usize) -> KnowledgeOutcome {
    let mut fragments: Vec<String> = Vec::new();
    let mut chunks: Vec<KnowledgeChunk> = Vec::new();
    let mut seen_paths: HashSet<String> = HashSet::new();

    for response in responses {
        if !response.context.is_empty() {
            fragments.push(response.context);
        }
        for chunk in response.chunks {
            if seen_paths.insert(chunk.source_path.clone()) {
                chunks.push(chunk);
            }
        }
    }

    KnowledgeOutcome {
        context: truncate_to_budget(fragments.join(MERGE_SEPARATOR), budget),
        chunks,
    }
}

/// Normalizes a token budget; zero falls back to the default.
const fn effective_budget(max_context_tokens: usize) -> usize {
    if max_context_tokens == 0 {
        DEFAULT_MAX_CONTEXT_TOKENS
    } else {
        max_context_tokens
    }
}

/// Replaces every `{key}` occurrence with its value from `context`.
///
/// Keys absent from the map leave the literal token in place; templates are
/// never rejected for unknown placeholders.
#[must_use]
pub fn interpolate_template(template: &str, context: &HashMap<String, String>) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            context
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Truncates text to `max_tokens * 4` characters, appending the marker when
/// truncation occurred.
fn truncate_to_budget(text: String, max_tokens: usize) -> String {
    let max_chars = max_tokens * 4;
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut truncated = text[..byte_idx].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        },
        None => text,
    }
}
