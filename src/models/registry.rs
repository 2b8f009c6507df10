//! Catalog registry summary.

use crate::models::{PlaybookId, Scope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry format version.
pub const REGISTRY_VERSION: &str = "1.0.0";

/// Summary of one playbook in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    /// Playbook identifier.
    pub id: PlaybookId,
    /// Playbook scope.
    pub scope: Scope,
    /// Playbook priority.
    pub priority: u8,
    /// Path of the source file.
    pub file_path: String,
    /// Tags from the playbook metadata.
    pub tags: Vec<String>,
}

/// A snapshot of every playbook in a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookRegistry {
    /// Registry format version.
    pub version: String,
    /// When the registry was generated.
    pub generated_at: DateTime<Utc>,
    /// One entry per loaded playbook.
    pub playbooks: Vec<RegistryEntry>,
}

impl PlaybookRegistry {
    /// Creates a registry from entries, stamped with the current time.
    #[must_use]
    pub fn new(playbooks: Vec<RegistryEntry>) -> Self {
        Self {
            version: REGISTRY_VERSION.to_string(),
            generated_at: Utc::now(),
            playbooks,
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.playbooks.len()
    }

    /// Returns true if the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playbooks.is_empty()
    }
}
