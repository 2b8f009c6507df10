//! Binary entry point for briefer.
//!
//! This binary provides the CLI interface for the briefer playbook system.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow option_if_let_else for environment variable fallback chains
#![allow(clippy::option_if_let_else)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use briefer::cli::{cmd_build_prompt, cmd_init, cmd_list, cmd_resolve};
use briefer::config::BrieferConfig;
use briefer::models::{ResolveQuery, Scope};
use briefer::observability::{self, LoggingConfig};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Briefer - playbook-driven prompt briefing for AI coding agents.
#[derive(Parser)]
#[command(name = "briefer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List playbooks in the workspace catalog.
    List {
        /// Filter by scope: system, package, domain, task, or policy.
        #[arg(short, long)]
        scope: Option<String>,

        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Resolve the best playbook for a query.
    Resolve {
        /// Task description to match against.
        #[arg(short, long)]
        task: Option<String>,

        /// Package name to match against playbook ids.
        #[arg(short, long)]
        package: Option<String>,

        /// Domain name to match against domain playbooks.
        #[arg(short, long)]
        domain: Option<String>,

        /// Error pattern to match against descriptions.
        #[arg(short, long)]
        error: Option<String>,

        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Build the full layered prompt for a task.
    BuildPrompt {
        /// Task description.
        #[arg(short, long)]
        task: String,

        /// Package the task targets.
        #[arg(short, long)]
        package: Option<String>,

        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Print each non-empty layer before the assembled prompt.
        #[arg(long)]
        show_layers: bool,

        /// Skip knowledge augmentation.
        #[arg(long)]
        skip_knowledge: bool,
    },

    /// Scaffold a playbooks directory with starter templates.
    Init {
        /// Overwrite existing files.
        #[arg(long)]
        force: bool,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = observability::init_logging(&LoggingConfig::from_env(cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: &BrieferConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::List { scope, json } => {
            let scope = scope.as_deref().map(parse_scope).transpose()?;
            cmd_list(config, scope, json)
        }

        Commands::Resolve {
            task,
            package,
            domain,
            error,
            json,
        } => {
            let query = ResolveQuery {
                task,
                package_name: package,
                domain,
                error_pattern: error,
            };
            cmd_resolve(config, &query, json)
        }

        Commands::BuildPrompt {
            task,
            package,
            json,
            show_layers,
            skip_knowledge,
        } => cmd_build_prompt(config, &task, package, json, show_layers, skip_knowledge).await,

        Commands::Init { force } => cmd_init(config, force),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<BrieferConfig, Box<dyn std::error::Error>> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return BrieferConfig::load_from_file(std::path::Path::new(config_path))
            .map_err(std::convert::Into::into);
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var("BRIEFER_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return BrieferConfig::load_from_file(std::path::Path::new(&config_path))
                .map_err(std::convert::Into::into);
        }
    }

    // Otherwise, load from default location
    Ok(BrieferConfig::load_default())
}

/// Parses a scope filter string.
fn parse_scope(s: &str) -> Result<Scope, Box<dyn std::error::Error>> {
    Scope::parse(s).ok_or_else(|| {
        briefer::Error::InvalidInput(format!(
            "unknown scope '{s}' (expected system, package, domain, task, or policy)"
        ))
        .into()
    })
}
