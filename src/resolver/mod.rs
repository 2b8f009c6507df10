//! Playbook resolution.
//!
//! Ranks playbooks against a [`ResolveQuery`] using a deterministic
//! weighted-additive heuristic. All text comparisons are substring
//! containment; no fuzzy matching, stemming, or learned ranking. Scoring is
//! pure computation over immutable inputs and performs no I/O.
//!
//! # Example
//!
//! ```
//! use briefer::{Playbook, ResolveQuery, Scope, resolve};
//!
//! let playbooks = vec![
//!     Playbook::new("task.fix-imports", Scope::Task, 3)
//!         .with_description("Fix broken imports in a package.")
//!         .with_tags(vec!["imports".to_string()]),
//! ];
//! let query = ResolveQuery::new().with_task("fix broken imports");
//!
//! let best = resolve(&playbooks, &query).unwrap();
//! assert_eq!(best.playbook.id.as_str(), "task.fix-imports");
//! ```

use crate::models::{Playbook, ResolveQuery, Scope};

/// Weight added when the task is contained in the description.
pub const WEIGHT_DESCRIPTION_MATCH: u32 = 10;
/// Weight added per tag overlapping the task (either direction).
pub const WEIGHT_TAG_MATCH: u32 = 5;
/// Weight added per strategy overlapping the task (either direction).
pub const WEIGHT_STRATEGY_MATCH: u32 = 3;
/// Weight added when the package name is contained in the playbook id.
pub const WEIGHT_PACKAGE_MATCH: u32 = 15;
/// Weight added when a domain-scope playbook's id contains the domain.
pub const WEIGHT_DOMAIN_MATCH: u32 = 20;
/// Weight added when the error pattern is contained in the description.
pub const WEIGHT_ERROR_MATCH: u32 = 12;
/// Multiplier applied to the playbook priority, added unconditionally.
pub const WEIGHT_PRIORITY_FACTOR: u32 = 2;

/// A playbook paired with its match score for one query.
///
/// Ephemeral: produced per resolution, never persisted.
#[derive(Debug, Clone)]
pub struct ScoredMatch<'a> {
    /// The matched playbook.
    pub playbook: &'a Playbook,
    /// Total match score.
    pub score: u32,
    /// Human-readable account of the match.
    pub reason: String,
}

impl<'a> ScoredMatch<'a> {
    fn new(playbook: &'a Playbook, score: u32) -> Self {
        let reason = format!("score {} (priority {})", score, playbook.priority);
        Self {
            playbook,
            score,
            reason,
        }
    }
}

/// Treats empty-string discriminators as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Computes the match score of one playbook against a query.
///
/// Each signal contributes independently; the priority boost applies
/// unconditionally, so a validated catalog never scores zero.
#[must_use]
pub fn score_playbook(playbook: &Playbook, query: &ResolveQuery) -> u32 {
    let mut score = 0;

    if let Some(task) = present(query.task.as_deref()) {
        let task_lower = task.to_lowercase();

        if playbook.description.to_lowercase().contains(&task_lower) {
            score += WEIGHT_DESCRIPTION_MATCH;
        }

        for tag in &playbook.metadata.tags {
            let tag_lower = tag.to_lowercase();
            if task_lower.contains(&tag_lower) || tag_lower.contains(&task_lower) {
                score += WEIGHT_TAG_MATCH;
            }
        }

        for strategy in &playbook.strategies {
            let strategy_lower = strategy.to_lowercase();
            if task_lower.contains(&strategy_lower) || strategy_lower.contains(&task_lower) {
                score += WEIGHT_STRATEGY_MATCH;
            }
        }
    }

    if let Some(package_name) = present(query.package_name.as_deref()) {
        if playbook.id.contains(package_name) {
            score += WEIGHT_PACKAGE_MATCH;
        }
    }

    if let Some(domain) = present(query.domain.as_deref()) {
        if playbook.scope == Scope::Domain && playbook.id.contains(domain) {
            score += WEIGHT_DOMAIN_MATCH;
        }
    }

    if let Some(error_pattern) = present(query.error_pattern.as_deref()) {
        if playbook
            .description
            .to_lowercase()
            .contains(&error_pattern.to_lowercase())
        {
            score += WEIGHT_ERROR_MATCH;
        }
    }

    score + u32::from(playbook.priority) * WEIGHT_PRIORITY_FACTOR
}

/// Resolves the best-matching playbook for a query.
///
/// Returns `None` when the list is empty or the best score is zero. Ties
/// break toward the lexicographically smaller id for reproducibility.
#[must_use]
pub fn resolve<'a>(playbooks: &'a [Playbook], query: &ResolveQuery) -> Option<ScoredMatch<'a>> {
    let mut best: Option<(&Playbook, u32)> = None;

    for playbook in playbooks {
        let score = score_playbook(playbook, query);
        let better = match best {
            None => true,
            Some((current, current_score)) => {
                score > current_score || (score == current_score && playbook.id < current.id)
            }
        };
        if better {
            best = Some((playbook, score));
        }
    }

    let (playbook, score) = best?;
    if score == 0 {
        return None;
    }
    Some(ScoredMatch::new(playbook, score))
}

/// Resolves every playbook with a positive score, best first.
///
/// Sorted by score descending, then id ascending.
#[must_use]
pub fn resolve_layers<'a>(playbooks: &'a [Playbook], query: &ResolveQuery) -> Vec<ScoredMatch<'a>> {
    let mut matches: Vec<ScoredMatch<'a>> = playbooks
        .iter()
        .map(|playbook| (playbook, score_playbook(playbook, query)))
        .filter(|(_, score)| *score > 0)
        .map(|(playbook, score)| ScoredMatch::new(playbook, score))
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.playbook.id.cmp(&b.playbook.id))
    });
    matches
}

/// Returns every playbook with the given scope, in input order.
#[must_use]
pub fn filter_by_scope(playbooks: &[Playbook], scope: Scope) -> Vec<&Playbook> {
    playbooks.iter().filter(|p| p.scope == scope).collect()
}
