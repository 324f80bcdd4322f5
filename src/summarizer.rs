//! LLM summaries of the README, the code analysis and the merged report.
//!
//! A model failure never aborts a run. The failure text is written in place of
//! the summary so the problem shows up in the generated document.

use crate::config::Config;
use crate::error::{DocgenError, Result};
use crate::llm::{self, LlmClient};
use crate::prompts;
use crate::store::{ArtifactContent, ArtifactKind, FileStore};
use std::sync::Arc;

/// Heading placed above the summary appended to the code analysis
pub const CODE_SUMMARY_HEADING: &str = "## 🤖 Gemini AI Code Summary";
/// Heading placed above the executive summary in the merged report
pub const EXECUTIVE_SUMMARY_HEADING: &str = "# 🧭 Executive AI Summary";

/// What one model call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The model's reply, unmodified
    Generated(String),
    /// Placeholder text describing why no summary exists
    Failed(String),
}

impl SummaryOutcome {
    /// Text to persist: the reply or the failure placeholder
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Failed(text) => text,
        }
    }

    /// Whether the model produced the text
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    fn from_reply(reply: Result<String>, failure_prefix: &str) -> Self {
        match reply {
            Ok(text) => Self::Generated(text),
            Err(e) => {
                log::warn!("{}: {}", failure_prefix, e);
                Self::Failed(format!("{}: {}", failure_prefix, e))
            }
        }
    }
}

/// Both README summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeSummaries {
    /// Written to `ai_summary.md`
    pub concise: SummaryOutcome,
    /// Written to `ai_readme_summary.md`
    pub narrative: SummaryOutcome,
}

/// Runs the summarisation prompts against the store
pub struct Summarizer {
    store: FileStore,
    client: Option<Arc<dyn LlmClient>>,
    document_char_limit: usize,
}

impl Summarizer {
    /// Summarizer over `store` using `client`; `None` means no model is configured
    pub fn new(store: FileStore, client: Option<Arc<dyn LlmClient>>, document_char_limit: usize) -> Self {
        Self {
            store,
            client,
            document_char_limit,
        }
    }

    /// Summarizer using the configured provider
    pub fn from_config(config: &Config, store: FileStore) -> Self {
        Self::new(store, llm::client_from_config(config), config.llm.document_char_limit)
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        match &self.client {
            Some(client) => {
                log::debug!("Sending {} chars to {}", prompt.len(), client.name());
                client.generate(prompt).await
            }
            None => Err(DocgenError::Config("LLM not configured (missing API key)".to_string())),
        }
    }

    async fn input(&self, kind: ArtifactKind) -> Option<String> {
        match self.store.read(kind).await {
            ArtifactContent::Present(text) => Some(text),
            ArtifactContent::Missing => {
                log::warn!("No {} found, skipping", kind);
                None
            }
            ArtifactContent::Unreadable(reason) => {
                log::warn!("Skipping summary: {}", reason);
                None
            }
        }
    }

    /// Writes the concise and narrative README summaries
    ///
    /// Returns `None` without touching any artifact when there is no README.
    pub async fn summarize_readme(&self) -> Result<Option<ReadmeSummaries>> {
        let Some(readme) = self.input(ArtifactKind::Readme).await else {
            return Ok(None);
        };
        log::info!("Summarizing README ({} chars)", readme.len());

        let concise = SummaryOutcome::from_reply(
            self.ask(&prompts::with_body(prompts::README_CONCISE, &readme)).await,
            "⚠️ Gemini summarization failed",
        );
        let narrative = SummaryOutcome::from_reply(
            self.ask(&prompts::with_body(prompts::README_NARRATIVE, &readme)).await,
            "⚠️ Gemini narrative generation failed",
        );

        self.store.write(ArtifactKind::AiSummary, concise.text()).await?;
        self.store.write(ArtifactKind::AiReadmeSummary, narrative.text()).await?;
        log::info!(
            "Created {} and {}",
            ArtifactKind::AiSummary,
            ArtifactKind::AiReadmeSummary
        );

        Ok(Some(ReadmeSummaries { concise, narrative }))
    }

    /// Writes `ai_code_summary.txt` and appends it to the code analysis
    pub async fn summarize_code_analysis(&self) -> Result<Option<SummaryOutcome>> {
        let Some(analysis) = self.input(ArtifactKind::CodeAnalysis).await else {
            return Ok(None);
        };
        log::info!("Generating code analysis summary");

        let summary = SummaryOutcome::from_reply(
            self.ask(&prompts::with_body(prompts::CODE_ANALYSIS, &analysis)).await,
            "⚠️ Gemini summarization failed",
        );

        self.store.write(ArtifactKind::AiCodeSummary, summary.text()).await?;

        let appendix = format!("\n\n---\n{}\n{}", CODE_SUMMARY_HEADING, summary.text());
        if let Err(e) = self.store.append(ArtifactKind::CodeAnalysis, &appendix).await {
            log::warn!("Could not append AI summary to {}: {}", ArtifactKind::CodeAnalysis, e);
        }

        Ok(Some(summary))
    }

    /// Writes an executive summary of the merged report and prepends it to the report
    ///
    /// Only the first `document_char_limit` characters of the report are sent.
    pub async fn summarize_documentation(&self) -> Result<Option<SummaryOutcome>> {
        let Some(document) = self.input(ArtifactKind::FinalDocumentation).await else {
            return Ok(None);
        };
        let excerpt = truncate_chars(&document, self.document_char_limit);
        log::info!("Generating executive summary from {} chars", excerpt.chars().count());

        let prompt = prompts::EXECUTIVE_SUMMARY.replace("{0}", excerpt);
        let summary = match self.ask(&prompt).await {
            Ok(reply) if reply.trim().is_empty() => {
                SummaryOutcome::Failed("(No summary returned by Gemini model.)".to_string())
            }
            Ok(reply) => SummaryOutcome::Generated(reply.trim().to_string()),
            Err(e) => {
                log::warn!("Executive summary failed: {}", e);
                SummaryOutcome::Failed(format!("(Error during Gemini summarization: {})", e))
            }
        };

        self.store.write(ArtifactKind::AiSummary, summary.text()).await?;

        let combined = format!(
            "{}\n\n{}\n\n---\n{}",
            EXECUTIVE_SUMMARY_HEADING,
            summary.text().trim(),
            document.trim()
        );
        if let Err(e) = self.store.write(ArtifactKind::FinalDocumentation, &combined).await {
            log::warn!("Could not embed AI summary into {}: {}", ArtifactKind::FinalDocumentation, e);
        }

        Ok(Some(summary))
    }
}

/// First `limit` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
