//! Layered prompt composition.
//!
//! Builds the six prompt layers from a main playbook, its supporting
//! playbooks, and optional retrieved context, then assembles the non-empty
//! layers in fixed order. Composition is pure: no I/O, no logging, and it
//! never fails on absent optional inputs (missing pieces render as empty
//! layers, which the assembly omits along with their separators).

use crate::models::{BuiltPrompt, Playbook, PromptLayer, PromptLayers};

/// Separator between assembled layers.
pub const LAYER_SEPARATOR: &str = "\n\n---\n\n";

/// System-directives fallback when no system playbook is available.
pub const DEFAULT_SYSTEM_DIRECTIVES: &str =
    "You are an AI coding assistant operating under playbook guidance.";

/// Supporting playbooks feeding the non-task layers.
#[derive(Debug, Clone, Default)]
pub struct SupportingPlaybooks<'a> {
    /// System-scope playbooks for the system-directives layer.
    pub system: Vec<&'a Playbook>,
    /// Package playbooks for the package-instructions layer.
    pub package: Vec<&'a Playbook>,
    /// Domain playbooks for the domain-strategies layer.
    pub domain: Vec<&'a Playbook>,
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_system_directives(system: &[&Playbook]) -> String {
    if system.is_empty() {
        return DEFAULT_SYSTEM_DIRECTIVES.to_string();
    }

    let sections: Vec<String> = system
        .iter()
        .map(|pb| {
            format!(
                "# {}\n\n{}\n\n{}",
                pb.metadata.tags.join(", "),
                pb.description,
                bullet_list(&pb.strategies)
            )
        })
        .collect();

    sections.join(LAYER_SEPARATOR)
}

fn build_policies(main: &Playbook) -> String {
    let policies = &main.policies;
    let mut lines: Vec<String> = vec!["# Behavioral Policies".to_string(), String::new()];

    if !policies.allow_write && !policies.allow_delete {
        lines.push("⚠️ READ-ONLY MODE - No file modifications allowed".to_string());
    } else {
        if policies.allow_write {
            lines.push("✅ File writing: ALLOWED".to_string());
        }
        if policies.allow_delete {
            lines.push("⚠️ File deletion: ALLOWED (use with caution)".to_string());
        }
    }

    if !policies.restricted_paths.is_empty() {
        lines.push(String::new());
        lines.push("🚫 Restricted paths:".to_string());
        for path in &policies.restricted_paths {
            lines.push(format!("  - {path}"));
        }
    }

    if !policies.forbidden_actions.is_empty() {
        lines.push(String::new());
        lines.push("🚫 Forbidden actions:".to_string());
        for action in &policies.forbidden_actions {
            lines.push(format!("  - {action}"));
        }
    }

    lines.join("\n")
}

fn build_package_instructions(packages: &[&Playbook]) -> String {
    if packages.is_empty() {
        return String::new();
    }

    let sections: Vec<String> = packages
        .iter()
        .map(|pb| {
            format!(
                "## Package: {}\n\n{}\n\n### Strategies:\n{}",
                pb.id,
                pb.description,
                bullet_list(&pb.strategies)
            )
        })
        .collect();

    format!("# Package-Specific Instructions\n\n{}", sections.join("\n\n"))
}

fn build_domain_strategies(domains: &[&Playbook]) -> String {
    if domains.is_empty() {
        return String::new();
    }

    let sections: Vec<String> = domains
        .iter()
        .map(|pb| {
            format!(
                "## Domain: {}\n\n{}\n\n### Strategies:\n{}",
                pb.scope,
                pb.description,
                bullet_list(&pb.strategies)
            )
        })
        .collect();

    format!("# Domain Strategies\n\n{}", sections.join("\n\n"))
}

fn build_task_playbook(main: &Playbook) -> String {
    let mut lines: Vec<String> = vec![
        format!("# Task: {}", main.id),
        String::new(),
        main.description.clone(),
        String::new(),
        "## Strategies:".to_string(),
        String::new(),
    ];

    for strategy in &main.strategies {
        lines.push(strategy.clone());
    }

    if !main.checks.is_empty() {
        lines.push(String::new());
        lines.push("## Validation Checks:".to_string());
        lines.push(String::new());
        for check in &main.checks {
            lines.push(format!("- [{}] {}", check.id, check.description));
        }
    }

    if !main.examples.is_empty() {
        lines.push(String::new());
        lines.push("## Examples:".to_string());
        lines.push(String::new());
        for example in &main.examples {
            lines.push(format!("### Task: {}", example.task));
            lines.push(String::new());
            lines.push("Expected steps:".to_string());
            for (idx, step) in example.expected_steps.iter().enumerate() {
                lines.push(format!("{}. {step}", idx + 1));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn build_context_layer(context_text: Option<&str>) -> String {
    match context_text {
        Some(text) if !text.is_empty() => format!("# Relevant Context\n\n{text}"),
        _ => String::new(),
    }
}

/// Estimates the token count of a text: `ceil(chars / 4)`.
///
/// A fixed heuristic, not a tokenizer; exact for any length.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Joins non-empty layers with [`LAYER_SEPARATOR`] in composition order.
///
/// Empty layers contribute nothing, not even a separator; all layers empty
/// yields the empty string.
#[must_use]
pub fn assemble(layers: &PromptLayers) -> String {
    let parts: Vec<&str> = layers
        .iter()
        .map(|(_, text)| text)
        .filter(|text| !text.is_empty())
        .collect();
    parts.join(LAYER_SEPARATOR)
}

/// Composes the full briefing prompt for a main playbook.
#[must_use]
pub fn compose(
    main: &Playbook,
    supporting: &SupportingPlaybooks<'_>,
    context_text: Option<&str>,
) -> BuiltPrompt {
    let mut layers = PromptLayers::default();
    layers.set(
        PromptLayer::SystemDirectives,
        build_system_directives(&supporting.system),
    );
    layers.set(PromptLayer::Policies, build_policies(main));
    layers.set(
        PromptLayer::PackageInstructions,
        build_package_instructions(&supporting.package),
    );
    layers.set(
        PromptLayer::DomainStrategies,
        build_domain_strategies(&supporting.domain),
    );
    layers.set(PromptLayer::TaskPlaybook, build_task_playbook(main));
    layers.set(PromptLayer::Context, build_context_layer(context_text));

    let full_prompt = assemble(&layers);
    let token_count = estimate_tokens(&full_prompt);

    BuiltPrompt {
        layers,
        full_prompt,
        token_count,
    }
}
