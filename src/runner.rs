//! Spawns the external mapping and supervisor tools.

use crate::config::ToolCommand;
use crate::error::{DocgenError, Result};
use crate::store::RepositoryReference;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// What a finished tool left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Captured standard output, lossily decoded
    pub stdout: String,
    /// Captured standard error, lossily decoded
    pub stderr: String,
    /// Exit code; `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl ToolOutput {
    /// Whether the tool exited with status zero
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs tools inside the store directory
///
/// The call waits for the child to exit and enforces no timeout. A non-zero
/// exit status is reported in [`ToolOutput`] but is not an error.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    workdir: PathBuf,
    repo_env_var: String,
}

impl ToolRunner {
    /// Runner that starts children in `workdir`
    pub fn new(workdir: impl Into<PathBuf>, repo_env_var: &str) -> Self {
        Self {
            workdir: workdir.into(),
            repo_env_var: repo_env_var.to_string(),
        }
    }

    /// Runs `tool` for `repo`
    ///
    /// The URL is exported through the configured environment variable when
    /// non-empty and is also written to the child's stdin.
    pub async fn run(&self, tool: &ToolCommand, repo: &RepositoryReference) -> Result<ToolOutput> {
        log::info!("Running {} for '{}'", tool.display(), repo);

        let mut command = Command::new(&tool.program);
        command
            .args(&tool.args)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if !repo.is_empty() {
            command.env(&self.repo_env_var, repo.as_str());
        }

        let mut child = command
            .spawn()
            .map_err(|e| DocgenError::Tool(format!("Failed to start {}: {}", tool.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Tools that never read stdin may already have exited.
            if let Err(e) = stdin.write_all(repo.as_str().as_bytes()).await {
                log::debug!("Could not write repository URL to {}: {}", tool.program, e);
            }
        }

        let output = child.wait_with_output().await?;
        let result = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        if !result.stderr.trim().is_empty() {
            log::debug!("{} stderr:\n{}", tool.program, result.stderr.trim_end());
        }
        if !result.succeeded() {
            log::warn!(
                "{} exited with {:?}; continuing with its output",
                tool.display(),
                result.exit_code
            );
        }

        Ok(result)
    }
}
