#![allow(dead_code)]

use repodoc::api::{create_app, AppState};
use repodoc::config::{LlmConfig, ToolCommand, ToolsConfig};
use repodoc::presentation::PollSettings;
use repodoc::{DocService, FileStore};
use std::time::Duration;
use tempfile::TempDir;

pub mod test_helpers {
    use super::*;

    pub async fn setup_llm_server() -> mockito::ServerGuard {
        mockito::Server::new_async().await
    }

    /// Model settings pointed at a mock server
    pub fn llm_config(base_url: &str) -> LlmConfig {
        LlmConfig {
            api_base: Some(base_url.to_string()),
            ..LlmConfig::default()
        }
    }

    pub fn gemini_reply(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    /// Tools that run shell snippets, so tests need no external programs
    pub fn sh_tools(mapper: &str, supervisor: &str) -> ToolsConfig {
        ToolsConfig {
            mapper: ToolCommand::new("sh", &["-c", mapper]),
            supervisor: ToolCommand::new("sh", &["-c", supervisor]),
            repo_env_var: "REPO_URL".to_string(),
        }
    }

    pub fn fast_poll() -> PollSettings {
        PollSettings {
            timeout: Duration::from_millis(300),
            interval: Duration::from_millis(50),
        }
    }

    pub fn test_app(dir: &TempDir, tools: ToolsConfig) -> axum::Router {
        let service = DocService::new(FileStore::new(dir.path()), tools);
        create_app(AppState::new(service, fast_poll()))
    }

    pub fn write_artifact(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).expect("Failed to write artifact");
    }

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }
}
