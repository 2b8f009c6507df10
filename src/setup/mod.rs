//! Workspace scaffolding.
//!
//! `init` writes the embedded starter playbooks and a README into a
//! workspace so users start from a working catalog instead of a blank
//! directory.

mod defaults;

pub use defaults::{README, STARTER_DIRS, STARTER_PLAYBOOKS, StarterPlaybook};

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Outcome of an `init` run.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Files written by this run.
    pub created: Vec<PathBuf>,
    /// Files left untouched because they already existed.
    pub skipped: Vec<PathBuf>,
}

/// Scaffolds a playbooks directory with the starter set.
///
/// Creates the scope subdirectories, the README, and the starter playbooks.
/// Existing files are left untouched (and reported as skipped) unless
/// `force` is set.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created.
pub fn init(playbooks_dir: &Path, force: bool) -> Result<InitReport> {
    for dir in STARTER_DIRS {
        let path = playbooks_dir.join(dir);
        fs::create_dir_all(&path).map_err(|e| Error::OperationFailed {
            operation: "create_playbooks_dir".to_string(),
            cause: e.to_string(),
        })?;
    }

    let mut report = InitReport::default();
    write_template(playbooks_dir.join("README.md"), README, force, &mut report)?;
    for starter in STARTER_PLAYBOOKS {
        write_template(
            playbooks_dir.join(starter.path),
            starter.contents,
            force,
            &mut report,
        )?;
    }

    tracing::debug!(
        created = report.created.len(),
        skipped = report.skipped.len(),
        "Scaffolded playbooks directory"
    );
    Ok(report)
}

fn write_template(
    dest: PathBuf,
    contents: &str,
    force: bool,
    report: &mut InitReport,
) -> Result<()> {
    if dest.exists() && !force {
        report.skipped.push(dest);
        return Ok(());
    }

    fs::write(&dest, contents).map_err(|e| Error::OperationFailed {
        operation: "write_starter_playbook".to_string(),
        cause: e.to_string(),
    })?;
    report.created.push(dest);
    Ok(())
}
