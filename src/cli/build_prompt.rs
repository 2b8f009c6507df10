//! CLI command for building the full layered prompt for a task.

use crate::Error;
use crate::config::BrieferConfig;
use crate::models::{BuiltPrompt, PromptLayers};
use crate::services::{BriefOptions, BriefingService};
use serde::Serialize;
use std::io::{self, Write};

/// JSON output for the build-prompt command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildPromptJson<'a> {
    full_prompt: &'a str,
    token_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    layers: Option<&'a PromptLayers>,
}

/// Writes the prompt as human-readable output.
///
/// With `show_layers`, each non-empty layer is printed under its own banner
/// before the assembled prompt.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_prompt<W: Write>(
    writer: &mut W,
    prompt: &BuiltPrompt,
    show_layers: bool,
) -> io::Result<()> {
    if show_layers {
        writeln!(writer, "\nPrompt Layers:")?;
        for (layer, content) in prompt.layers.iter() {
            if content.is_empty() {
                continue;
            }
            writeln!(writer, "\n=== {} ===\n", layer.as_str().to_uppercase())?;
            writeln!(writer, "{content}")?;
        }
        writeln!(writer, "\n{}\n", "=".repeat(60))?;
    }

    writeln!(writer, "\nFull Prompt:\n")?;
    writeln!(writer, "{}", prompt.full_prompt)?;
    writeln!(writer, "\nToken count: ~{}\n", prompt.token_count)?;
    Ok(())
}

fn write_json<W: Write>(
    writer: &mut W,
    prompt: &BuiltPrompt,
    show_layers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&BuildPromptJson {
        full_prompt: &prompt.full_prompt,
        token_count: prompt.token_count,
        layers: show_layers.then_some(&prompt.layers),
    })?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the build-prompt command.
///
/// # Errors
///
/// Returns an error if the catalog is missing or empty, no playbook matches
/// the task, or output fails.
pub async fn cmd_build_prompt(
    config: &BrieferConfig,
    task: &str,
    package: Option<String>,
    json: bool,
    show_layers: bool,
    skip_knowledge: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let dir = config.playbooks_path(&cwd);
    let playbooks = super::load_catalog_required(&dir)?;

    let mut options = BriefOptions::new().with_skip_knowledge(skip_knowledge);
    if let Some(name) = package {
        options = options.with_package_name(name);
    }

    let service = BriefingService::new(config.clone());
    let Some(prompt) = service.brief(task, &playbooks, &options).await? else {
        return Err(Error::InvalidInput(format!("no playbook matched task: {task}")).into());
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        write_json(&mut handle, &prompt, show_layers)
    } else {
        write_prompt(&mut handle, &prompt, show_layers).map_err(Into::into)
    }
}
