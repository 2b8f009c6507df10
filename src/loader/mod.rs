//! Playbook loading.
//!
//! Scans a directory tree for YAML playbook files, parses and validates
//! them, and produces the in-memory catalog the resolver works over. Loading
//! is batch-tolerant: a malformed or invalid file is skipped with a warning
//! and never fails the batch, so one bad playbook cannot take down an
//! invocation.
//!
//! Validation enforces the structural invariants the rest of the system
//! relies on: a non-empty `id`, a priority within `[1,5]`, and id uniqueness
//! within the catalog (the first file wins; later duplicates are skipped).

use crate::models::{Playbook, PlaybookId, PlaybookRegistry, RegistryEntry};
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lowest priority a playbook may declare.
pub const MIN_PRIORITY: u8 = 1;
/// Highest priority a playbook may declare.
pub const MAX_PRIORITY: u8 = 5;

/// Collects every `.yml`/`.yaml` file under `dir`, sorted by path.
///
/// Sorting makes catalog order deterministic regardless of directory
/// iteration order.
///
/// # Errors
///
/// Returns an error when `dir` does not exist or the walk fails.
pub fn scan_playbook_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "playbooks directory not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| Error::OperationFailed {
            operation: "scan_playbooks".to_string(),
            cause: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some("yml" | "yaml") = entry.path().extension().and_then(|ext| ext.to_str()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Loads and validates a single playbook file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not valid YAML, or
/// violates a structural invariant.
pub fn load_playbook(path: &Path) -> Result<Playbook> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "load_playbook".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;

    let playbook: Playbook = serde_yaml_ng::from_str(&content).map_err(|e| {
        Error::InvalidInput(format!("{}: invalid playbook YAML: {e}", path.display()))
    })?;

    if let Some(cause) = validation_error(&playbook) {
        return Err(Error::InvalidInput(format!("{}: {cause}", path.display())));
    }

    Ok(playbook)
}

/// Returns the first structural violation, if any.
fn validation_error(playbook: &Playbook) -> Option<String> {
    if playbook.id.is_empty() {
        return Some("playbook id must not be empty".to_string());
    }
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&playbook.priority) {
        return Some(format!(
            "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}, got {}",
            playbook.priority
        ));
    }
    None
}

/// Loads every valid playbook under `dir`, with its source path.
fn load_valid(dir: &Path) -> Result<Vec<(PathBuf, Playbook)>> {
    let files = scan_playbook_files(dir)?;
    let mut loaded: Vec<(PathBuf, Playbook)> = Vec::new();
    let mut seen: HashSet<PlaybookId> = HashSet::new();

    for path in files {
        match load_playbook(&path) {
            Ok(playbook) => {
                if seen.contains(&playbook.id) {
                    tracing::warn!(
                        path = %path.display(),
                        id = %playbook.id,
                        "Skipping playbook with duplicate id"
                    );
                    continue;
                }
                seen.insert(playbook.id.clone());
                loaded.push((path, playbook));
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping invalid playbook");
            },
        }
    }

    Ok(loaded)
}

/// Loads the playbook catalog from `dir`.
///
/// Invalid files are skipped with a warning; the returned catalog contains
/// only validated playbooks in sorted file order.
///
/// # Errors
///
/// Returns an error when the directory is missing or unreadable.
pub fn load_catalog(dir: &Path) -> Result<Vec<Playbook>> {
    Ok(load_valid(dir)?
        .into_iter()
        .map(|(_, playbook)| playbook)
        .collect())
}

/// Builds a registry snapshot of the catalog under `dir`.
///
/// # Errors
///
/// Returns an error when the directory is missing or unreadable.
pub fn build_registry(dir: &Path) -> Result<PlaybookRegistry> {
    let entries = load_valid(dir)?
        .into_iter()
        .map(|(path, playbook)| RegistryEntry {
            id: playbook.id,
            scope: playbook.scope,
            priority: playbook.priority,
            file_path: path.display().to_string(),
            tags: playbook.metadata.tags,
        })
        .collect();

    Ok(PlaybookRegistry::new(entries))
}
