/// Short repository overview from the README
pub const README_CONCISE: &str = "Summarize this README.md in under 10 lines. \
Keep it concise, clear, and suitable as a repository overview.";

/// Narrative rewrite of the README
pub const README_NARRATIVE: &str = "Rewrite this README.md as a human-readable project story in markdown. \
Explain its purpose, functionality, and use cases in natural language. \
Include a short Mermaid diagram or Markdown table showing system flow or architecture.";

/// Summary of the static analysis report
pub const CODE_ANALYSIS: &str = "You are a code analysis expert. Summarize this codebase analysis in Markdown. \
Explain the architecture, main modules, and their relationships. \
Include a short Mermaid diagram or Markdown table summarizing dependencies or architecture flow.";

/// Executive summary of the merged report; `{0}` receives the document
pub const EXECUTIVE_SUMMARY: &str = r#"
You are a skilled technical writer.
Summarize the following repository documentation into a short,
human-readable overview suitable for the first page of a report.

Rules:
- Keep your summary under 10 lines.
- Capture key goals, architecture, and functionality.
- Include **at most one** simple Mermaid diagram or ASCII chart
  showing system flow or module relationships.
- Do NOT repeat code or bullet-dump lists.
- Use professional tone and clear structure.

---
{0}
"#;

/// Joins an instruction prompt and the text it applies to
pub fn with_body(instruction: &str, body: &str) -> String {
    format!("{}\n\n{}", instruction, body)
}
