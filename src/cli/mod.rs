//! CLI command implementations.
//!
//! This module provides the command-line interface for briefer. Each
//! submodule implements a specific CLI command.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | List the playbooks in the workspace catalog |
//! | `resolve` | Resolve the best playbook for a query |
//! | `build-prompt` | Build the full layered prompt for a task |
//! | `init` | Scaffold a playbooks directory with starter templates |
//!
//! # Example Usage
//!
//! ```bash
//! # Scaffold a workspace
//! briefer init
//!
//! # List all playbooks
//! briefer list --scope task
//!
//! # Resolve the playbook for a task
//! briefer resolve --task "fix broken imports"
//!
//! # Build the full prompt
//! briefer build-prompt --task "fix broken imports" --package "example-service" --json
//! ```

mod build_prompt;
mod init;
mod list;
mod resolve;

pub use build_prompt::cmd_build_prompt;
pub use init::cmd_init;
pub use list::cmd_list;
pub use resolve::{ResolvedOutput, cmd_resolve};

use crate::models::Playbook;
use crate::{Error, Result, loader};
use std::path::Path;

/// Loads a catalog, treating an empty one as an error.
///
/// `resolve` and `build-prompt` cannot do anything useful with zero
/// playbooks, so they fail up front naming the directory.
fn load_catalog_required(dir: &Path) -> Result<Vec<Playbook>> {
    let playbooks = loader::load_catalog(dir)?;
    if playbooks.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no playbooks found in {}",
            dir.display()
        )));
    }
    Ok(playbooks)
}
