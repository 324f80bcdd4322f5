//! Assembles the final markdown report from the artifacts in the store.

use crate::error::Result;
use crate::store::{ArtifactContent, ArtifactKind, FileStore};
use chrono::Local;

/// Placeholder for a missing concise summary
pub const NO_SUMMARY: &str = "_Gemini summary unavailable._";
/// Placeholder for a missing narrative overview
pub const NO_OVERVIEW: &str = "_No AI overview generated._";
/// Placeholder when the README has no installation line
pub const NO_INSTALL_HINT: &str = "_See README for detailed installation instructions._";
/// Placeholder when the README has no usage line
pub const NO_USAGE_HINT: &str = "_See README for usage examples._";
/// Placeholder for a missing code analysis
pub const NO_ANALYSIS: &str = "(No code analysis found)";

/// Keywords that mark an installation line
pub const INSTALL_KEYWORDS: [&str; 4] = ["install", "requirements", "pip", "setup"];
/// Keywords that mark a usage line
pub const USAGE_KEYWORDS: [&str; 4] = ["usage", "run", "example", "how to"];

const TITLE: &str = "# 📘 Repository Documentation";
const SUMMARY_HEADING: &str = "## 🧭 Repository Summary (AI)";
const OVERVIEW_HEADING: &str = "## 📝 Project Overview";
const INSTALL_HEADING: &str = "## 🧩 Installation";
const USAGE_HEADING: &str = "## ▶️ Usage";
const API_HEADING: &str = "## 📚 API Reference";
const ANALYSIS_HEADING: &str = "## 🧠 Code Analysis";
const DIAGRAM_HEADING: &str = "## 🪶 Repository Diagram";
const ATTRIBUTION: &str = "✨ _Generated by repodoc_";

const API_TABLE: [&str; 5] = [
    "| Endpoint | Description |",
    "|-----------|-------------|",
    "| `/clone_repo` | Clone and prepare repository for analysis |",
    "| `/map_repo` | Generate structure map |",
    "| `/generate_docs` | Produce full Markdown documentation |",
];

/// The merged markdown report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDocument(String);

impl MergedDocument {
    /// Markdown text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the merger reads, loaded up front
#[derive(Debug, Clone)]
pub struct MergeInputs {
    /// Raw README, searched for hints
    pub readme: ArtifactContent,
    /// Concise AI summary
    pub summary: ArtifactContent,
    /// Narrative AI overview
    pub overview: ArtifactContent,
    /// Code analysis report
    pub analysis: ArtifactContent,
    /// Mermaid source, as stored
    pub diagram: ArtifactContent,
}

impl MergeInputs {
    /// Reads every merge input from the store
    pub async fn load(store: &FileStore) -> Self {
        Self {
            readme: store.read_raw(ArtifactKind::Readme).await,
            summary: store.read(ArtifactKind::AiSummary).await,
            overview: store.read(ArtifactKind::AiReadmeSummary).await,
            analysis: store.read(ArtifactKind::CodeAnalysis).await,
            diagram: store.read_raw(ArtifactKind::Diagram).await,
        }
    }
}

/// Returns the first line containing any keyword, compared case-insensitively
///
/// The line comes back exactly as written; an empty string means no match.
pub fn grep_hint<'a>(text: &'a str, keywords: &[&str]) -> &'a str {
    text.lines()
        .find(|line| {
            let lower = line.to_lowercase();
            keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
        })
        .unwrap_or("")
}

fn or_placeholder(hint: &str, placeholder: &str) -> String {
    if hint.is_empty() {
        placeholder.to_string()
    } else {
        hint.to_string()
    }
}

/// Builds the report; `generated_at` is embedded verbatim under the title
pub fn compose(inputs: &MergeInputs, generated_at: &str) -> MergedDocument {
    let readme = inputs.readme.present().unwrap_or("");
    let install = grep_hint(readme, &INSTALL_KEYWORDS);
    let usage = grep_hint(readme, &USAGE_KEYWORDS);

    let mut lines: Vec<String> = vec![
        TITLE.to_string(),
        format!("**Generated:** {}\n", generated_at),
        SUMMARY_HEADING.to_string(),
        inputs.summary.text_or(NO_SUMMARY),
        String::new(),
        OVERVIEW_HEADING.to_string(),
        inputs.overview.text_or(NO_OVERVIEW),
        String::new(),
        INSTALL_HEADING.to_string(),
        or_placeholder(install, NO_INSTALL_HINT),
        String::new(),
        USAGE_HEADING.to_string(),
        or_placeholder(usage, NO_USAGE_HINT),
        String::new(),
        API_HEADING.to_string(),
    ];
    lines.extend(API_TABLE.iter().map(|row| row.to_string()));
    lines.push(String::new());

    lines.push(ANALYSIS_HEADING.to_string());
    lines.push(inputs.analysis.text_or(NO_ANALYSIS));
    lines.push(String::new());

    if let Some(diagram) = inputs.diagram.present() {
        lines.push(DIAGRAM_HEADING.to_string());
        lines.push("```mermaid".to_string());
        lines.push(diagram.trim_end_matches(&['\n', '\r'][..]).to_string());
        lines.push("```".to_string());
        lines.push(String::new());
    }

    lines.push(ATTRIBUTION.to_string());
    MergedDocument(lines.join("\n"))
}

/// Reads artifacts and writes `final_documentation.md`
#[derive(Debug, Clone)]
pub struct DocumentMerger {
    store: FileStore,
}

impl DocumentMerger {
    /// Merger over the given store
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Merges the current artifacts and persists the result
    pub async fn merge(&self) -> Result<MergedDocument> {
        log::info!("Merging artifacts into {}", ArtifactKind::FinalDocumentation);
        let inputs = MergeInputs::load(&self.store).await;
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let document = compose(&inputs, &generated_at);

        self.store
            .write(ArtifactKind::FinalDocumentation, document.as_str())
            .await?;
        log::info!(
            "Documentation combined successfully at {}",
            self.store.path(ArtifactKind::FinalDocumentation).display()
        );
        Ok(document)
    }
}
