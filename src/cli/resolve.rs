//! CLI command for resolving the best playbook for a query.

use crate::config::BrieferConfig;
use crate::models::ResolveQuery;
use crate::{Error, resolver};
use serde::Serialize;
use std::io::{self, Write};

/// The winning playbook, shaped for output.
#[derive(Debug, Serialize)]
pub struct ResolvedOutput {
    /// Winning playbook id.
    pub id: String,
    /// Total match score.
    pub score: u32,
    /// Human-readable account of the match.
    pub reason: String,
    /// Playbook description.
    pub description: String,
}

/// JSON envelope; `resolved` is null when nothing matched.
#[derive(Debug, Serialize)]
struct ResolveJson<'a> {
    resolved: Option<&'a ResolvedOutput>,
}

/// Writes a resolution as human-readable output.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_resolved<W: Write>(writer: &mut W, resolved: &ResolvedOutput) -> io::Result<()> {
    writeln!(writer, "\nResolved playbook:\n")?;
    writeln!(writer, "  ID: {}", resolved.id)?;
    writeln!(writer, "  Score: {}", resolved.score)?;
    writeln!(writer, "  Reason: {}", resolved.reason)?;
    writeln!(writer, "  Description: {}", resolved.description)?;
    writeln!(writer)?;
    Ok(())
}

fn write_json<W: Write>(
    writer: &mut W,
    resolved: Option<&ResolvedOutput>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&ResolveJson { resolved })?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the resolve command.
///
/// # Errors
///
/// Returns an error if no discriminator was given, the catalog is missing
/// or empty, or output fails. Resolving to no match is not an error.
pub fn cmd_resolve(
    config: &BrieferConfig,
    query: &ResolveQuery,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if query.is_empty() {
        return Err(Error::InvalidInput(
            "provide at least one of --task, --package, --domain, or --error".to_string(),
        )
        .into());
    }

    let cwd = std::env::current_dir()?;
    let dir = config.playbooks_path(&cwd);
    let playbooks = super::load_catalog_required(&dir)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match resolver::resolve(&playbooks, query) {
        Some(matched) => {
            let output = ResolvedOutput {
                id: matched.playbook.id.to_string(),
                score: matched.score,
                reason: matched.reason.clone(),
                description: matched.playbook.description.clone(),
            };
            if json {
                write_json(&mut handle, Some(&output))
            } else {
                write_resolved(&mut handle, &output).map_err(Into::into)
            }
        }
        None => {
            if json {
                write_json(&mut handle, None)
            } else {
                writeln!(handle, "\nNo matching playbook found.\n").map_err(Into::into)
            }
        }
    }
}
