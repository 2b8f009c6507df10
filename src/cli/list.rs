//! CLI command for listing playbooks.

use crate::config::BrieferConfig;
use crate::loader;
use crate::models::{RegistryEntry, Scope};
use serde::Serialize;
use std::io::{self, Write};

/// JSON output wrapper for the list command.
#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    playbooks: &'a [RegistryEntry],
}

/// Sorts entries for display: priority descending, then id ascending.
pub fn sort_entries(entries: &mut [RegistryEntry]) {
    entries.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Writes entries as a human-readable listing.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(writer: &mut W, entries: &[RegistryEntry]) -> io::Result<()> {
    writeln!(writer, "\nFound {} playbook(s):\n", entries.len())?;
    for entry in entries {
        writeln!(writer, "  {}", entry.id)?;
        writeln!(
            writer,
            "    Scope: {} | Priority: {}",
            entry.scope, entry.priority
        )?;
        writeln!(writer, "    Tags: {}", entry.tags.join(", "))?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes entries as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(
    writer: &mut W,
    entries: &[RegistryEntry],
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&ListOutput { playbooks: entries })?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the playbooks directory cannot be scanned or output
/// fails.
pub fn cmd_list(
    config: &BrieferConfig,
    scope: Option<Scope>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let dir = config.playbooks_path(&cwd);
    let registry = loader::build_registry(&dir)?;

    let mut entries = registry.playbooks;
    if let Some(scope) = scope {
        entries.retain(|e| e.scope == scope);
    }
    sort_entries(&mut entries);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        write_json(&mut handle, &entries)
    } else {
        write_table(&mut handle, &entries).map_err(Into::into)
    }
}
