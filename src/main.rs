use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use repodoc::{
    api,
    config::Config,
    error::Result,
    logging,
    presentation::{self, ArtifactPoller, PollSettings, ReportPage},
    ArtifactKind, DocsClient, DocumentMerger, FileStore, Summarizer, SummaryOutcome,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Merge the artifacts into final_documentation.md and exit
    #[arg(long)]
    merge: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service (the default)
    Serve,
    /// Summarize one artifact with the configured model
    Summarize {
        #[command(subcommand)]
        target: SummarizeTarget,
    },
    /// README summary, code summary, merge, then the executive summary
    Pipeline,
    /// Drive a running service for a repository and save the report as HTML
    Generate {
        /// Repository URL
        url: String,
        /// Where to write the HTML report
        #[arg(short, long, default_value = "report.html")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum SummarizeTarget {
    /// repo_readme.txt into ai_summary.md and ai_readme_summary.md
    Readme,
    /// code_analysis.txt into ai_code_summary.txt
    Code,
    /// final_documentation.md into ai_summary.md
    Docs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "[ERROR]".bright_red().bold(), e.to_string().bright_red());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let serving = !cli.merge && matches!(cli.command, None | Some(Commands::Serve));
    if serving {
        logging::init_tracing(&cli.log_level);
    } else {
        logging::init(&cli.log_level)?;
    }

    let config = Config::load(cli.config.as_deref())?;

    if cli.merge {
        return merge(&config).await;
    }

    match cli.command {
        None | Some(Commands::Serve) => api::serve(config).await,
        Some(Commands::Summarize { target }) => summarize(&config, target).await,
        Some(Commands::Pipeline) => pipeline(&config).await,
        Some(Commands::Generate { url, output }) => generate(&config, &url, output).await,
    }
}

async fn merge(config: &Config) -> Result<()> {
    config.ensure_directories_exist().await?;
    let store = FileStore::new(&config.store_dir);
    DocumentMerger::new(store.clone()).merge().await?;

    println!(
        "{} {}",
        "✅ Final documentation generated:".bright_green(),
        store.path(ArtifactKind::FinalDocumentation).display()
    );
    Ok(())
}

async fn summarize(config: &Config, target: SummarizeTarget) -> Result<()> {
    config.ensure_llm_configured()?;
    let summarizer = Summarizer::from_config(config, FileStore::new(&config.store_dir));

    match target {
        SummarizeTarget::Readme => match summarizer.summarize_readme().await? {
            Some(summaries) => {
                report_outcome("README summary", &summaries.concise);
                report_outcome("README narrative", &summaries.narrative);
            }
            None => skipped(ArtifactKind::Readme),
        },
        SummarizeTarget::Code => match summarizer.summarize_code_analysis().await? {
            Some(outcome) => report_outcome("Code summary", &outcome),
            None => skipped(ArtifactKind::CodeAnalysis),
        },
        SummarizeTarget::Docs => match summarizer.summarize_documentation().await? {
            Some(outcome) => report_outcome("Executive summary", &outcome),
            None => skipped(ArtifactKind::FinalDocumentation),
        },
    }
    Ok(())
}

async fn pipeline(config: &Config) -> Result<()> {
    config.ensure_llm_configured()?;
    config.ensure_directories_exist().await?;

    println!("\n{}", "Running documentation pipeline".bright_green().bold());
    println!("{}\n", "==============================".bright_yellow());

    for (step, target) in [
        ("1/4", SummarizeTarget::Readme),
        ("2/4", SummarizeTarget::Code),
    ] {
        println!("{} {}", step.bright_cyan(), describe(target));
        summarize(config, target).await?;
    }

    println!("{} {}", "3/4".bright_cyan(), "Merging artifacts");
    merge(config).await?;

    println!("{} {}", "4/4".bright_cyan(), describe(SummarizeTarget::Docs));
    summarize(config, SummarizeTarget::Docs).await?;

    println!("\n{}", "Pipeline finished.".bright_green());
    Ok(())
}

async fn generate(config: &Config, url: &str, output: PathBuf) -> Result<()> {
    let client = DocsClient::new(&config.ui.backend_url)?;
    info!("Using backend at {}", client.base_url());

    let pb = create_progress_bar();
    pb.set_message(format!("Running documentation pipeline for {}", url));
    let result = client.run(url).await;
    pb.finish_and_clear();
    let response = result?;

    let poller = ArtifactPoller::new(FileStore::new(&config.store_dir), PollSettings::from(&config.ui));
    let mut page = ReportPage::collect(&poller).await;
    if page.markdown == presentation::not_generated(ArtifactKind::FinalDocumentation) {
        // Remote backend: fall back to the report carried in the response.
        if let Some(markdown) = response.markdown {
            page.markdown = markdown;
        }
    }

    tokio::fs::write(&output, page.render()).await?;
    let diagrams = presentation::extract_mermaid_blocks(&page.markdown).len();

    println!("{}", "✅ Documentation generated successfully!".bright_green());
    println!("  {} {}", "Report:".bright_white().bold(), output.display());
    println!("  {} {}", "Diagrams:".bright_white().bold(), diagrams);
    Ok(())
}

fn describe(target: SummarizeTarget) -> &'static str {
    match target {
        SummarizeTarget::Readme => "Summarizing README",
        SummarizeTarget::Code => "Summarizing code analysis",
        SummarizeTarget::Docs => "Writing executive summary",
    }
}

fn report_outcome(label: &str, outcome: &SummaryOutcome) {
    match outcome {
        SummaryOutcome::Generated(_) => println!("  {} {}", "✅".bright_green(), label),
        SummaryOutcome::Failed(reason) => {
            println!("  {} {}: {}", "⚠️".bright_yellow(), label, reason.bright_yellow())
        }
    }
}

fn skipped(input: ArtifactKind) {
    println!("  {} {} not found, skipped", "⚠️".bright_yellow(), input.file_name());
}

/// Create a spinner for the long-running backend call
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
