//! Command-line knowledge fallback.
//!
//! Answers knowledge requests by spawning an external retrieval command and
//! parsing its JSON stdout. Used when no [`KnowledgeSource`] capability is
//! injected, typically for standalone CLI invocations.
//!
//! The command is invoked with its configured arguments plus the query text
//! appended last. Expected output shape:
//!
//! ```json
//! {"results": {"chunks": [{"text": "...", "path": "...", "score": 0.9}]}}
//! ```
//!
//! An `{"error": {"message": "..."}}` object, a non-zero exit code, or
//! unparsable output all count as that query failing.

use crate::knowledge::{KnowledgeChunk, KnowledgeRequest, KnowledgeResult, KnowledgeSource};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Knowledge source backed by an external command.
#[derive(Debug, Clone)]
pub struct CommandKnowledgeSource {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandKnowledgeSource {
    /// Creates a source that runs `program` with `args` plus the query text.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    /// Sets the working directory for the spawned command.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Returns the configured program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl KnowledgeSource for CommandKnowledgeSource {
    async fn query(&self, request: &KnowledgeRequest) -> Result<KnowledgeResult> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(&request.text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let output = command.output().await.map_err(|e| Error::OperationFailed {
            operation: "knowledge_command".to_string(),
            cause: format!("failed to spawn '{}': {e}", self.program),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::OperationFailed {
                operation: "knowledge_command".to_string(),
                cause: format!("knowledge query failed: {}", stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_command_response(&stdout)
    }
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    error: Option<CommandError>,
    #[serde(default)]
    results: Option<CommandResults>,
}

#[derive(Debug, Deserialize)]
struct CommandError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommandResults {
    #[serde(default)]
    chunks: Vec<CommandChunk>,
}

#[derive(Debug, Deserialize)]
struct CommandChunk {
    text: String,
    path: String,
    #[serde(default)]
    score: Option<f64>,
}

/// Parses the JSON response of the external knowledge command.
fn parse_command_response(stdout: &str) -> Result<KnowledgeResult> {
    let response: CommandResponse =
        serde_json::from_str(stdout).map_err(|e| Error::OperationFailed {
            operation: "knowledge_command".to_string(),
            cause: format!("unparsable knowledge response: {e}"),
        })?;

    if let Some(error) = response.error {
        return Err(Error::OperationFailed {
            operation: "knowledge_command".to_string(),
            cause: error.message,
        });
    }

    let raw_chunks = response.results.map(|r| r.chunks).unwrap_or_default();

    let context_text = raw_chunks
        .iter()
        .map(|chunk| format!("// {}\n{}", chunk.path, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    let chunks = raw_chunks
        .into_iter()
        .map(|chunk| KnowledgeChunk {
            text: chunk.text,
            source_path: chunk.path,
            relevance_score: chunk.score.unwrap_or(0.0),
            metadata: None,
        })
        .collect();

    Ok(KnowledgeResult {
        chunks,
        context_text: Some(context_text),
    })
}
