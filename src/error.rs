use std::io;
use thiserror::Error;
use async_openai::error::OpenAIError;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, DocgenError>;

/// Errors that can occur while producing documentation
#[derive(Debug, Error)]
pub enum DocgenError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// OpenAI API errors
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Language Model errors
    #[error("LLM error: {0}")]
    LLM(String),

    /// External tool errors (spawn failures, broken pipes)
    #[error("Tool error: {0}")]
    Tool(String),

    /// General message errors
    #[error("{0}")]
    Message(String),
}
