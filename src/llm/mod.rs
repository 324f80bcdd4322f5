//! Model providers behind a single text-in, text-out seam.

use crate::config::{Config, LlmProvider};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAIClient;

/// A model that turns a prompt into text
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &'static str;

    /// Sends one prompt and returns the raw reply text
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Builds the configured provider, or `None` when its API key is absent
pub fn client_from_config(config: &Config) -> Option<Arc<dyn LlmClient>> {
    let Some(api_key) = config.llm_api_key() else {
        log::warn!("No API key for the {:?} provider; summaries will be placeholders", config.llm.provider);
        return None;
    };

    let client: Arc<dyn LlmClient> = match config.llm.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::new(api_key.to_string(), &config.llm)),
        LlmProvider::OpenAI => Arc::new(OpenAIClient::new(api_key.to_string(), &config.llm)),
    };
    Some(client)
}
