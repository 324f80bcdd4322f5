//! Waiting for artifacts and turning the merged report into a browsable page.

use crate::config::UiConfig;
use crate::store::{ArtifactContent, ArtifactKind, FileStore};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::time::Duration;
use tokio::time::Instant;

static NOISE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#+\s*(contributing|get\s*started)").expect("valid regex"));

static MERMAID_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```mermaid\n(.*?)```").expect("valid regex"));

/// Stand-in ceiling when the configured one does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Headings already shown above the document on the report page
const DUPLICATE_HEADINGS: [&str; 2] = ["## 🧭 Repository Summary", "## 📝 Project Overview"];

/// How long and how often to look for an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Give up after this long
    pub timeout: Duration,
    /// Look again after this long
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(500),
        }
    }
}

impl From<&UiConfig> for PollSettings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            timeout: ui.poll_timeout(),
            interval: ui.poll_interval(),
        }
    }
}

/// Placeholder for an artifact that did not show up before the ceiling
pub fn not_generated(kind: ArtifactKind) -> String {
    format!("(File {} not generated in time.)", kind.file_name())
}

/// Bounded wait for artifacts produced by someone else
///
/// Writes made through the same [`FileStore`] wake the poller at once; files
/// written by external processes are picked up on the next interval tick.
#[derive(Debug, Clone)]
pub struct ArtifactPoller {
    store: FileStore,
    settings: PollSettings,
}

impl ArtifactPoller {
    /// Poller over `store`
    pub fn new(store: FileStore, settings: PollSettings) -> Self {
        Self { store, settings }
    }

    /// Waits until the artifact exists with non-zero size; `false` on timeout
    pub async fn wait_for(&self, kind: ArtifactKind) -> bool {
        let now = Instant::now();
        let deadline = now
            .checked_add(self.settings.timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let mut writes = self.store.subscribe();

        loop {
            if self.store.is_ready(kind).await {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                log::debug!("Gave up waiting for {}", kind);
                return false;
            }
            let nap = self.settings.interval.min(deadline - now);
            tokio::select! {
                _ = tokio::time::sleep(nap) => {}
                _ = writes.changed() => {}
            }
        }
    }

    /// Waits for the artifact and returns its trimmed text or a placeholder
    pub async fn read(&self, kind: ArtifactKind) -> String {
        if !self.wait_for(kind).await {
            return not_generated(kind);
        }
        match self.store.read(kind).await {
            ArtifactContent::Present(text) => text,
            ArtifactContent::Missing => String::new(),
            ArtifactContent::Unreadable(reason) => reason,
        }
    }
}

/// Removes "contributing" and "get started" sections
///
/// A section runs from its heading to the next line starting with `#`, or to
/// the end of the text.
pub fn strip_noise_sections(markdown: &str) -> String {
    let mut text = markdown.to_string();
    let mut from = 0;
    while let Some((start, heading_end)) = NOISE_HEADING
        .find_at(&text, from)
        .map(|m| (m.start(), m.end()))
    {
        let end = text[heading_end..]
            .find("\n#")
            .map_or(text.len(), |offset| heading_end + offset);
        text.replace_range(start..end, "");
        from = start;
    }
    text
}

/// Drops heading lines whose sections are already shown elsewhere on the page
pub fn drop_duplicate_headings(markdown: &str) -> String {
    markdown
        .lines()
        .filter(|line| {
            let line = line.trim();
            !DUPLICATE_HEADINGS.iter().any(|h| line.starts_with(h))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns every `## ` heading into a `<details>` block closed at the next one
pub fn make_collapsible(markdown: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut open = false;

    for line in markdown.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            if open {
                result.push(String::new());
                result.push("</details>".to_string());
            }
            result.push(format!("<details><summary><b>{}</b></summary>", title.trim()));
            result.push(String::new());
            open = true;
        } else {
            result.push(line.to_string());
        }
    }
    if open {
        result.push(String::new());
        result.push("</details>".to_string());
    }
    result.join("\n")
}

/// Sources of every ```` ```mermaid ```` block, in document order
pub fn extract_mermaid_blocks(markdown: &str) -> Vec<String> {
    MERMAID_BLOCK
        .captures_iter(markdown)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Report cleanup applied before display
pub fn clean_document(markdown: &str) -> String {
    drop_duplicate_headings(&strip_noise_sections(markdown))
}

/// Renders markdown (tables and strikethrough included) to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Repository Documentation</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; max-width: 1100px; }
        pre { background: #f4f4f4; padding: 10px; border-radius: 5px; overflow-x: auto; }
        details { margin: 12px 0; padding: 8px 12px; background: #f9f9f9; border-radius: 5px; }
        .mermaid { margin: 20px 0; }
        .warning { color: #a15c00; }
    </style>
</head>
<body>
"#;

const MERMAID_SCRIPT: &str = r#"<script type="module">
  import mermaid from 'https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs';
  mermaid.initialize({ startOnLoad: true, theme: "neutral" });
</script>
"#;

/// Inputs of the report page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPage {
    /// AI summary shown at the top
    pub summary: String,
    /// Repository tree, shown preformatted
    pub structure: String,
    /// Merged report
    pub markdown: String,
}

impl ReportPage {
    /// Waits for the summary, the structure and the report
    pub async fn collect(poller: &ArtifactPoller) -> Self {
        Self {
            summary: poller.read(ArtifactKind::AiSummary).await,
            structure: poller.read(ArtifactKind::Structure).await,
            markdown: poller.read(ArtifactKind::FinalDocumentation).await,
        }
    }

    /// Full HTML page
    pub fn render(&self) -> String {
        let mut page = String::from(PAGE_HEAD);
        page.push_str("<h1>🧠 Repository Documentation</h1>\n");

        page.push_str("<h2>🧭 Repository Summary (AI)</h2>\n");
        if self.summary.trim().is_empty() {
            page.push_str("<p><em>Gemini API call failed to produce summary.</em></p>\n");
        } else {
            page.push_str(&markdown_to_html(&self.summary));
        }

        page.push_str("<details><summary><b>📁 Repository Structure</b></summary>\n<pre><code>");
        if self.structure.trim().is_empty() {
            page.push_str("No structure data found.");
        } else {
            page.push_str(&escape_html(&self.structure));
        }
        page.push_str("</code></pre>\n</details>\n");

        page.push_str("<h2>📖 Full Markdown Documentation</h2>\n");
        if self.markdown.trim().is_empty() {
            page.push_str("<p class=\"warning\">No Markdown content found.</p>\n");
        } else {
            let cleaned = clean_document(&self.markdown);
            page.push_str(&markdown_to_html(&make_collapsible(&cleaned)));

            let diagrams = extract_mermaid_blocks(&cleaned);
            if !diagrams.is_empty() {
                page.push_str("<hr>\n<h2>🪶 Rendered Mermaid Diagrams</h2>\n");
                for (i, diagram) in diagrams.iter().enumerate() {
                    page.push_str(&format!(
                        "<p><b>Diagram {}</b></p>\n<div class=\"mermaid\">\n{}</div>\n",
                        i + 1,
                        escape_html(diagram)
                    ));
                }
                page.push_str(MERMAID_SCRIPT);
            }
        }

        page.push_str("</body>\n</html>\n");
        page
    }
}
