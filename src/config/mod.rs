mod env_manager;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{DocgenError, Result};
use std::fs;

pub use env_manager::{get_env_value, ApiKeys};

/// Main configuration struct for the application
///
/// Every section has defaults, so a configuration file only needs to name the
/// values it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding every pipeline artifact
    pub store_dir: PathBuf,
    /// HTTP service settings
    pub server: ServerConfig,
    /// Model provider settings
    pub llm: LlmConfig,
    /// External tools driven by the orchestrator
    pub tools: ToolsConfig,
    /// Presentation-side settings
    pub ui: UiConfig,
    /// API keys, environment only
    #[serde(skip)]
    pub api_keys: ApiKeys,
}

/// HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

/// Which model provider answers summarisation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini through the Generative Language REST API
    Gemini,
    /// Any OpenAI-compatible chat completions endpoint
    OpenAI,
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider to call
    pub provider: LlmProvider,
    /// Model name passed to the provider
    pub model: String,
    /// Override for the provider base URL
    pub api_base: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Characters of the merged document sent for the executive summary
    pub document_char_limit: usize,
}

/// A program plus arguments, run inside the store directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    /// Executable name or path
    pub program: String,
    /// Arguments passed verbatim
    #[serde(default)]
    pub args: Vec<String>,
}

/// External tools driven by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Clones and maps a repository
    pub mapper: ToolCommand,
    /// Runs the full documentation pipeline
    pub supervisor: ToolCommand,
    /// Environment variable carrying the repository URL into tools
    pub repo_env_var: String,
}

/// Presentation-side settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Where the backend service listens
    pub backend_url: String,
    /// Ceiling on waiting for one artifact, in milliseconds
    pub poll_timeout_ms: u64,
    /// Delay between two existence checks, in milliseconds
    pub poll_interval_ms: u64,
}

impl Config {
    /// Creates a new configuration rooted at the given artifact directory
    pub fn new(store_dir: PathBuf) -> Self {
        Self {
            store_dir,
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            tools: ToolsConfig::default(),
            ui: UiConfig::default(),
            api_keys: ApiKeys::from_env(),
        }
    }

    /// Loads configuration from `path`, or from the default config file location
    ///
    /// A missing file yields the defaults. Environment overrides are applied
    /// last in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => dirs::config_dir().map(|dir| dir.join("repodoc").join("config.toml")),
        };

        let mut config = match config_path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(&p).map_err(|e| {
                    DocgenError::Config(format!("Failed to read config file {}: {}", p.display(), e))
                })?;
                Self::from_toml_str(&content)?
            }
            Some(p) if path.is_some() => {
                return Err(DocgenError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            _ => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parses a TOML document into a configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.api_keys = ApiKeys::from_env();
        Ok(config)
    }

    /// Applies `REPODOC_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = get_env_value("REPODOC_STORE_DIR") {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(port) = get_env_value("REPODOC_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = get_env_value("REPODOC_BACKEND_URL") {
            self.ui.backend_url = url;
        }
        if let Some(provider) = get_env_value("REPODOC_LLM_PROVIDER") {
            match provider.to_lowercase().as_str() {
                "gemini" => self.llm.provider = LlmProvider::Gemini,
                "openai" => self.llm.provider = LlmProvider::OpenAI,
                other => log::warn!("Ignoring unknown REPODOC_LLM_PROVIDER value: {}", other),
            }
        }
        if let Some(model) = get_env_value("REPODOC_LLM_MODEL") {
            self.llm.model = model;
        }
    }

    /// Ensures the artifact directory exists
    pub async fn ensure_directories_exist(&self) -> Result<()> {
        if !tokio::fs::try_exists(&self.store_dir).await? {
            tokio::fs::create_dir_all(&self.store_dir).await?;
        }
        Ok(())
    }

    /// Key for the configured provider, if present
    pub fn llm_api_key(&self) -> Option<&str> {
        match self.llm.provider {
            LlmProvider::Gemini => self.api_keys.gemini_api_key.as_deref(),
            LlmProvider::OpenAI => self.api_keys.openai_api_key.as_deref(),
        }
    }

    /// Fails when the configured provider has no API key
    pub fn ensure_llm_configured(&self) -> Result<()> {
        if self.llm_api_key().is_some() {
            return Ok(());
        }
        let var = match self.llm.provider {
            LlmProvider::Gemini => "GOOGLE_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        };
        Err(DocgenError::Config(format!("{} not found in environment", var)))
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DocgenError::Config(format!("Invalid listen address: {}", e)))
    }
}

impl UiConfig {
    /// Poll ceiling as a duration
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ToolCommand {
    /// Builds a command from a program and string arguments
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Shell-like rendering used in log lines
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: "gemini-2.0-flash".to_string(),
            api_base: None,
            temperature: 0.7,
            max_output_tokens: 8192,
            document_char_limit: 15_000,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mapper: ToolCommand::new("jac", &["run", "repo_mapper.jac"]),
            supervisor: ToolCommand::new("jac", &["run", "supervisor.jac"]),
            repo_env_var: "REPO_URL".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8001".to_string(),
            poll_timeout_ms: 10_000,
            poll_interval_ms: 500,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("artifacts"))
    }
}
