//! Composed prompt types.
//!
//! A briefing is assembled from six fixed layers in a stable order. Layers
//! that end up empty are dropped from the final text but remain addressable
//! in [`PromptLayers`] so callers can inspect what each stage produced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six prompt layers, in composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptLayer {
    /// Base directives from the system-scope playbook.
    SystemDirectives,
    /// Behavioral constraints from the main playbook's policies.
    Policies,
    /// Instructions from a package-scope playbook.
    PackageInstructions,
    /// Strategies from domain-scope playbooks.
    DomainStrategies,
    /// The main playbook's task recipe.
    TaskPlaybook,
    /// Retrieved knowledge context.
    Context,
}

impl PromptLayer {
    /// Returns the layer name as used in serialized output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SystemDirectives => "system-directives",
            Self::Policies => "policies",
            Self::PackageInstructions => "package-instructions",
            Self::DomainStrategies => "domain-strategies",
            Self::TaskPlaybook => "task-playbook",
            Self::Context => "context",
        }
    }

    /// Returns all layers in composition order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::SystemDirectives,
            Self::Policies,
            Self::PackageInstructions,
            Self::DomainStrategies,
            Self::TaskPlaybook,
            Self::Context,
        ]
    }
}

impl fmt::Display for PromptLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text produced for each of the six layers.
///
/// Every layer is always present; emptiness means the layer contributed
/// nothing and will be omitted from the assembled prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PromptLayers {
    /// Base directives text.
    pub system_directives: String,
    /// Behavioral policies text.
    pub policies: String,
    /// Package instructions text.
    pub package_instructions: String,
    /// Domain strategies text.
    pub domain_strategies: String,
    /// Task playbook text.
    pub task_playbook: String,
    /// Retrieved context text.
    pub context: String,
}

impl PromptLayers {
    /// Returns the text of the given layer.
    #[must_use]
    pub fn get(&self, layer: PromptLayer) -> &str {
        match layer {
            PromptLayer::SystemDirectives => &self.system_directives,
            PromptLayer::Policies => &self.policies,
            PromptLayer::PackageInstructions => &self.package_instructions,
            PromptLayer::DomainStrategies => &self.domain_strategies,
            PromptLayer::TaskPlaybook => &self.task_playbook,
            PromptLayer::Context => &self.context,
        }
    }

    /// Sets the text of the given layer.
    pub fn set(&mut self, layer: PromptLayer, text: String) {
        match layer {
            PromptLayer::SystemDirectives => self.system_directives = text,
            PromptLayer::Policies => self.policies = text,
            PromptLayer::PackageInstructions => self.package_instructions = text,
            PromptLayer::DomainStrategies => self.domain_strategies = text,
            PromptLayer::TaskPlaybook => self.task_playbook = text,
            PromptLayer::Context => self.context = text,
        }
    }

    /// Iterates over layers and their text in composition order.
    pub fn iter(&self) -> impl Iterator<Item = (PromptLayer, &str)> {
        PromptLayer::all()
            .into_iter()
            .map(move |layer| (layer, self.get(layer)))
    }
}

/// A fully composed briefing prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltPrompt {
    /// Per-layer text.
    pub layers: PromptLayers,
    /// The assembled prompt with empty layers omitted.
    pub full_prompt: String,
    /// Estimated token count of the assembled prompt.
    pub token_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order_is_stable() {
        let names: Vec<&str> = PromptLayer::all().iter().map(|l| l.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "system-directives",
                "policies",
                "package-instructions",
                "domain-strategies",
                "task-playbook",
                "context",
            ]
        );
    }

    #[test]
    fn test_layers_get_set() {
        let mut layers = PromptLayers::default();
        layers.set(PromptLayer::TaskPlaybook, "# Task: x".to_string());
        assert_eq!(layers.get(PromptLayer::TaskPlaybook), "# Task: x");
        assert_eq!(layers.get(PromptLayer::Context), "");
    }

    #[test]
    fn test_layers_iter_follows_composition_order() {
        let mut layers = PromptLayers::default();
        layers.set(PromptLayer::Context, "ctx".to_string());
        let collected: Vec<(PromptLayer, &str)> = layers.iter().collect();
        assert_eq!(collected.len(), 6);
        assert_eq!(collected[5], (PromptLayer::Context, "ctx"));
    }

    #[test]
    fn test_layer_serializes_kebab_case() {
        let json = serde_json::to_string(&PromptLayer::SystemDirectives).unwrap();
        assert_eq!(json, "\"system-directives\"");
    }
}
