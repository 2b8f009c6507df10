//! Configuration management.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::DEFAULT_MAX_CONTEXT_TOKENS;

/// Main configuration for briefer.
#[derive(Debug, Clone)]
pub struct BrieferConfig {
    /// Directory holding playbook files, resolved against the working
    /// directory when relative.
    pub playbooks_dir: PathBuf,
    /// Token budget for knowledge context when a playbook does not set one.
    pub default_max_context_tokens: usize,
    /// External knowledge command used when no capability is injected.
    pub knowledge: KnowledgeCommandConfig,
}

/// External knowledge command configuration.
///
/// The command is invoked with `args` plus the query text appended last and
/// must print the knowledge JSON protocol on stdout.
#[derive(Debug, Clone)]
pub struct KnowledgeCommandConfig {
    /// Program to run.
    pub program: String,
    /// Fixed arguments passed before the query text.
    pub args: Vec<String>,
}

impl Default for KnowledgeCommandConfig {
    fn default() -> Self {
        Self {
            program: "kb".to_string(),
            args: vec![
                "mind".to_string(),
                "rag-query".to_string(),
                "--agent".to_string(),
                "--mode".to_string(),
                "instant".to_string(),
                "--text".to_string(),
            ],
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Playbooks directory.
    pub playbooks_dir: Option<String>,
    /// Default knowledge token budget.
    pub default_max_context_tokens: Option<usize>,
    /// Knowledge command section.
    pub knowledge: Option<ConfigFileKnowledge>,
}

/// Knowledge section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileKnowledge {
    /// Program to run.
    pub command: Option<String>,
    /// Fixed arguments passed before the query text.
    pub args: Option<Vec<String>>,
}

impl Default for BrieferConfig {
    fn default() -> Self {
        Self {
            playbooks_dir: PathBuf::from("playbooks"),
            default_max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            knowledge: KnowledgeCommandConfig::default(),
        }
    }
}

impl BrieferConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/briefer/` on macOS)
    /// 2. XDG config dir (`~/.config/briefer/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        // Check platform-specific config dir first
        let platform_config = base_dirs.config_dir().join("briefer").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        // Fall back to XDG-style ~/.config/briefer/ for Unix compatibility
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("briefer")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `BrieferConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(playbooks_dir) = file.playbooks_dir {
            config.playbooks_dir = PathBuf::from(playbooks_dir);
        }
        if let Some(tokens) = file.default_max_context_tokens {
            config.default_max_context_tokens = tokens;
        }
        if let Some(knowledge) = file.knowledge {
            if let Some(command) = knowledge.command {
                config.knowledge.program = command;
            }
            if let Some(args) = knowledge.args {
                config.knowledge.args = args;
            }
        }

        config
    }

    /// Resolves the playbooks directory against a working directory.
    ///
    /// An absolute configured directory is used as-is.
    #[must_use]
    pub fn playbooks_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.playbooks_dir)
    }

    /// Sets the playbooks directory.
    #[must_use]
    pub fn with_playbooks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.playbooks_dir = dir.into();
        self
    }

    /// Sets the external knowledge command.
    #[must_use]
    pub fn with_knowledge_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.knowledge.program = program.into();
        self.knowledge.args = args;
        self
    }
}
