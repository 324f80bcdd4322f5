//! Flat directory of named artifacts shared by every pipeline stage.
//!
//! Producers and consumers never pass file names around; they name an
//! [`ArtifactKind`] and the store owns the mapping to disk. Reads never fail:
//! a missing file becomes [`ArtifactContent::Missing`] and an unreadable one
//! carries its error text so callers can show it in place of the content.

use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;

/// Every artifact the pipeline knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Last repository URL submitted to the service
    RepoUrl,
    /// Raw README text captured by the mapping tool
    Readme,
    /// Directory tree captured by the mapping tool
    Structure,
    /// Static analysis report
    CodeAnalysis,
    /// Concise AI summary
    AiSummary,
    /// Narrative AI overview of the README
    AiReadmeSummary,
    /// AI summary of the code analysis
    AiCodeSummary,
    /// Mermaid source describing the repository
    Diagram,
    /// The merged markdown report
    FinalDocumentation,
}

impl ArtifactKind {
    /// Fixed file name inside the store directory
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::RepoUrl => "repo_url.txt",
            Self::Readme => "repo_readme.txt",
            Self::Structure => "repo_structure.txt",
            Self::CodeAnalysis => "code_analysis.txt",
            Self::AiSummary => "ai_summary.md",
            Self::AiReadmeSummary => "ai_readme_summary.md",
            Self::AiCodeSummary => "ai_code_summary.txt",
            Self::Diagram => "mermaid_diagram.txt",
            Self::FinalDocumentation => "final_documentation.md",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Result of reading an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    /// The artifact exists and has non-blank content
    Present(String),
    /// The artifact is absent or blank
    Missing,
    /// Reading failed; the string describes the failure
    Unreadable(String),
}

impl ArtifactContent {
    /// Content to show, with `placeholder` standing in for a missing artifact
    ///
    /// Unreadable artifacts show their error description.
    pub fn text_or(&self, placeholder: &str) -> String {
        match self {
            Self::Present(text) => text.clone(),
            Self::Missing => placeholder.to_string(),
            Self::Unreadable(reason) => reason.clone(),
        }
    }

    /// The content when present
    pub fn present(&self) -> Option<&str> {
        match self {
            Self::Present(text) => Some(text),
            _ => None,
        }
    }
}

/// Handle on the artifact directory
///
/// Clones share the same write signal, so an in-process writer wakes every
/// in-process waiter.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    written: Arc<watch::Sender<u64>>,
}

impl FileStore {
    /// Opens a store rooted at `root`; the directory is not created here
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            root: root.into(),
            written: Arc::new(tx),
        }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of an artifact
    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Reads an artifact with surrounding whitespace removed
    pub async fn read(&self, kind: ArtifactKind) -> ArtifactContent {
        match self.read_raw(kind).await {
            ArtifactContent::Present(text) => ArtifactContent::Present(text.trim().to_string()),
            other => other,
        }
    }

    /// Reads an artifact exactly as stored
    ///
    /// Blank files still count as missing.
    pub async fn read_raw(&self, kind: ArtifactKind) -> ArtifactContent {
        let path = self.path(kind);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                if text.trim().is_empty() {
                    ArtifactContent::Missing
                } else {
                    ArtifactContent::Present(text)
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => ArtifactContent::Missing,
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                ArtifactContent::Unreadable(format!("(Error reading {}: {})", kind.file_name(), e))
            }
        }
    }

    /// Replaces an artifact's content
    pub async fn write(&self, kind: ArtifactKind, content: &str) -> Result<()> {
        tokio::fs::write(self.path(kind), content).await?;
        log::debug!("Wrote {} ({} bytes)", kind, content.len());
        self.signal_write();
        Ok(())
    }

    /// Appends to an artifact, creating it when absent
    pub async fn append(&self, kind: ArtifactKind, content: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(kind))
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        log::debug!("Appended {} bytes to {}", content.len(), kind);
        self.signal_write();
        Ok(())
    }

    /// Whether the artifact exists with a non-zero size
    pub async fn is_ready(&self, kind: ArtifactKind) -> bool {
        tokio::fs::metadata(self.path(kind))
            .await
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Receiver that changes whenever this process writes an artifact
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.written.subscribe()
    }

    fn signal_write(&self) {
        self.written.send_modify(|generation| *generation = generation.wrapping_add(1));
    }
}

/// The last repository URL submitted to the service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryReference(String);

impl RepositoryReference {
    /// Wraps a URL, trimming surrounding whitespace
    pub fn new(url: &str) -> Self {
        Self(url.trim().to_string())
    }

    /// URL text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no repository has been submitted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence for the single live [`RepositoryReference`]
///
/// Last write wins. There is no history and no locking.
#[derive(Debug, Clone)]
pub struct RepoRefStore {
    store: FileStore,
}

impl RepoRefStore {
    /// Keeps the reference inside `store`
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Loads the current reference; empty when none was ever saved
    pub async fn load(&self) -> RepositoryReference {
        match self.store.read(ArtifactKind::RepoUrl).await {
            ArtifactContent::Present(url) => RepositoryReference::new(&url),
            ArtifactContent::Missing => RepositoryReference::default(),
            ArtifactContent::Unreadable(reason) => {
                log::warn!("Falling back to an empty repository reference: {}", reason);
                RepositoryReference::default()
            }
        }
    }

    /// Replaces the current reference
    pub async fn save(&self, reference: &RepositoryReference) -> Result<()> {
        self.store.write(ArtifactKind::RepoUrl, reference.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_and_blank_artifacts() -> Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        assert_eq!(store.read(ArtifactKind::AiSummary).await, ArtifactContent::Missing);

        store.write(ArtifactKind::AiSummary, "  \n ").await?;
        assert_eq!(store.read(ArtifactKind::AiSummary).await, ArtifactContent::Missing);
        assert!(store.is_ready(ArtifactKind::AiSummary).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_trims_but_raw_does_not() -> Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());
        store.write(ArtifactKind::Diagram, "graph TD\n  A-->B\n").await?;

        assert_eq!(
            store.read(ArtifactKind::Diagram).await,
            ArtifactContent::Present("graph TD\n  A-->B".into())
        );
        assert_eq!(
            store.read_raw(ArtifactKind::Diagram).await,
            ArtifactContent::Present("graph TD\n  A-->B\n".into())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_append_extends_existing_content() -> Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());
        store.write(ArtifactKind::CodeAnalysis, "modules: 3").await?;
        store.append(ArtifactKind::CodeAnalysis, "\nsummary").await?;

        let text = tokio::fs::read_to_string(store.path(ArtifactKind::CodeAnalysis)).await?;
        assert_eq!(text, "modules: 3\nsummary");
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_artifact_describes_error() -> Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());
        // A directory where a file is expected cannot be read as one.
        tokio::fs::create_dir(store.path(ArtifactKind::Readme)).await?;

        match store.read(ArtifactKind::Readme).await {
            ArtifactContent::Unreadable(reason) => {
                assert!(reason.starts_with("(Error reading repo_readme.txt:"));
                assert_eq!(ArtifactContent::Unreadable(reason.clone()).text_or("x"), reason);
            }
            other => panic!("expected unreadable, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_writes_bump_subscribers() -> Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());
        let mut rx = store.subscribe();

        store.clone().write(ArtifactKind::AiSummary, "done").await?;
        assert!(rx.has_changed().unwrap_or(false));
        Ok(())
    }

    #[tokio::test]
    async fn test_repository_reference_last_write_wins() -> Result<()> {
        let dir = TempDir::new()?;
        let refs = RepoRefStore::new(FileStore::new(dir.path()));

        assert!(refs.load().await.is_empty());

        refs.save(&RepositoryReference::new("https://github.com/a/one")).await?;
        refs.save(&RepositoryReference::new(" https://github.com/a/two \n")).await?;
        assert_eq!(refs.load().await.as_str(), "https://github.com/a/two");
        Ok(())
    }
}
