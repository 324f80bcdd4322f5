#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! repodoc - turns a source repository into a merged, AI-summarised report
//!
//! External tools map the repository into text artifacts inside a shared
//! directory. This crate summarises those artifacts with a hosted language
//! model, merges them into one markdown report, and serves the pipeline over
//! HTTP.
//!
//! ## Usage
//! ```rust,ignore
//! use repodoc::{Config, DocumentMerger, FileStore};
//!
//! async fn example() -> repodoc::Result<()> {
//!     let config = Config::load(None)?;
//!     let merged = DocumentMerger::new(FileStore::new(&config.store_dir)).merge().await?;
//!     println!("{}", merged.as_str());
//!     Ok(())
//! }
//! ```

/// HTTP endpoints of the service
pub mod api;
/// HTTP client for a running service
pub mod client;
/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Language model providers
pub mod llm;
/// Logging configuration and utilities
pub mod logging;
/// Merging artifacts into the final report
pub mod merger;
/// Clone, map and generate operations
pub mod orchestrator;
/// Polling, post-processing and HTML rendering
pub mod presentation;
/// Prompt templates sent to the model
pub mod prompts;
/// External tool execution
pub mod runner;
/// Artifact files and the repository reference
pub mod store;
/// Model-backed summaries of artifacts
pub mod summarizer;

// Re-export common types
pub use client::DocsClient;
pub use config::Config;
pub use error::{DocgenError, Result};
pub use merger::{DocumentMerger, MergedDocument};
pub use orchestrator::DocService;
pub use store::{ArtifactContent, ArtifactKind, FileStore, RepositoryReference};
pub use summarizer::{Summarizer, SummaryOutcome};
