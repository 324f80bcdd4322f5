//! The clone, map and generate operations behind the HTTP endpoints.

use crate::config::{Config, ToolsConfig};
use crate::error::{DocgenError, Result};
use crate::runner::ToolRunner;
use crate::store::{ArtifactContent, ArtifactKind, FileStore, RepoRefStore, RepositoryReference};

/// Markdown returned by generate when no report exists
pub const NO_DOCUMENTATION: &str = "⚠️ No documentation file found.";

/// Result of generate: tool output plus the report text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Standard output of the supervisor tool
    pub output: String,
    /// Contents of `final_documentation.md`, or [`NO_DOCUMENTATION`]
    pub markdown: String,
}

/// Drives the external tools for one artifact store
///
/// Operations load the repository reference once and hand it to the runner
/// explicitly; nothing else about a previous call is remembered.
#[derive(Debug, Clone)]
pub struct DocService {
    store: FileStore,
    repo_refs: RepoRefStore,
    runner: ToolRunner,
    tools: ToolsConfig,
}

impl DocService {
    /// Service over `store` using the configured tools
    pub fn new(store: FileStore, tools: ToolsConfig) -> Self {
        Self {
            repo_refs: RepoRefStore::new(store.clone()),
            runner: ToolRunner::new(store.root(), &tools.repo_env_var),
            store,
            tools,
        }
    }

    /// Service built from a full configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(FileStore::new(&config.store_dir), config.tools.clone())
    }

    /// Artifact store used by this service
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Persists `repo_url` as the live reference, then runs the mapping tool
    pub async fn clone_repo(&self, repo_url: &str) -> Result<String> {
        let reference = RepositoryReference::new(repo_url);
        if reference.is_empty() {
            return Err(DocgenError::Validation("Empty repo_url.".to_string()));
        }

        self.repo_refs
            .save(&reference)
            .await
            .map_err(|e| DocgenError::Message(format!("Failed to save repo url: {}", e)))?;

        log::info!("Cloning repo: {}", reference);
        let output = self.runner.run(&self.tools.mapper, &reference).await?;
        Ok(output.stdout)
    }

    /// Runs the mapping tool for the last submitted repository
    pub async fn map_repo(&self) -> Result<String> {
        log::info!("Mapping repository...");
        let reference = self.repo_refs.load().await;
        let output = self.runner.run(&self.tools.mapper, &reference).await?;
        Ok(output.stdout)
    }

    /// Runs the supervisor tool, then returns the current report
    pub async fn generate_docs(&self) -> Result<GenerateReport> {
        log::info!("Running full documentation supervisor...");
        let reference = self.repo_refs.load().await;
        let output = self.runner.run(&self.tools.supervisor, &reference).await?;

        let markdown = match self.store.read_raw(ArtifactKind::FinalDocumentation).await {
            ArtifactContent::Present(text) => text,
            ArtifactContent::Missing => NO_DOCUMENTATION.to_string(),
            ArtifactContent::Unreadable(reason) => reason,
        };

        Ok(GenerateReport {
            output: output.stdout,
            markdown,
        })
    }
}
