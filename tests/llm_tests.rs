mod common;

use common::test_helpers::*;
use mockito::Matcher;
use repodoc::llm::{GeminiClient, LlmClient, OpenAIClient};
use repodoc::{DocgenError, FileStore, Summarizer, SummaryOutcome};
use std::sync::Arc;
use tempfile::TempDir;

const GEMINI_PATH: &str = "/models/gemini-2.0-flash:generateContent";

#[tokio::test]
async fn gemini_joins_candidate_parts() {
    let mut server = setup_llm_server().await;
    let mock = server
        .mock("POST", GEMINI_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [{ "parts": [{ "text": "hello" }] }]
        })))
        .with_body(
            serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "Hi " }, { "text": "there" }] } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GeminiClient::new("test-key".to_string(), &llm_config(&server.url()));
    assert_eq!(client.generate("hello").await.unwrap(), "Hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_error_status_is_llm_error() {
    let mut server = setup_llm_server().await;
    let _mock = server
        .mock("POST", GEMINI_PATH)
        .with_status(403)
        .with_body("API key not valid")
        .create_async()
        .await;

    let client = GeminiClient::new("bad".to_string(), &llm_config(&server.url()));
    let err = client.generate("hello").await.unwrap_err();
    assert!(matches!(err, DocgenError::LLM(_)));
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn gemini_without_candidates_is_llm_error() {
    let mut server = setup_llm_server().await;
    let _mock = server
        .mock("POST", GEMINI_PATH)
        .with_body(r#"{"candidates":[]}"#)
        .create_async()
        .await;

    let client = GeminiClient::new("k".to_string(), &llm_config(&server.url()));
    assert!(matches!(client.generate("x").await, Err(DocgenError::LLM(_))));
}

#[tokio::test]
async fn openai_returns_first_choice() {
    let mut server = setup_llm_server().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "A short summary." },
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = llm_config(&server.url());
    config.model = "gpt-4o-mini".to_string();
    let client = OpenAIClient::new("sk-test".to_string(), &config);

    assert_eq!(client.generate("Summarize").await.unwrap(), "A short summary.");
    mock.assert_async().await;
}

#[tokio::test]
async fn readme_summaries_through_gemini() {
    setup_test_logger();
    let mut server = setup_llm_server().await;
    let _concise = server
        .mock("POST", GEMINI_PATH)
        .match_body(Matcher::Regex("concise".to_string()))
        .with_body(gemini_reply("Concise summary."))
        .create_async()
        .await;
    let _narrative = server
        .mock("POST", GEMINI_PATH)
        .match_body(Matcher::Regex("project story".to_string()))
        .with_status(500)
        .with_body("overloaded")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_artifact(&dir, "repo_readme.txt", "# Tool\n\npip install tool\n");
    let client: Arc<dyn LlmClient> =
        Arc::new(GeminiClient::new("k".to_string(), &llm_config(&server.url())));
    let summarizer = Summarizer::new(FileStore::new(dir.path()), Some(client), 15_000);

    let summaries = summarizer.summarize_readme().await.unwrap().unwrap();
    assert_eq!(summaries.concise, SummaryOutcome::Generated("Concise summary.".to_string()));
    assert!(!summaries.narrative.is_generated());

    let summary = std::fs::read_to_string(dir.path().join("ai_summary.md")).unwrap();
    let narrative = std::fs::read_to_string(dir.path().join("ai_readme_summary.md")).unwrap();
    assert_eq!(summary, "Concise summary.");
    assert!(narrative.starts_with("⚠️ Gemini narrative generation failed: "));
    assert!(narrative.contains("overloaded"));
}
