mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::test_helpers::*;
use pretty_assertions::assert_eq;
use repodoc::api::{ResponseStatus, ServiceResponse};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_text(app: axum::Router, uri: &str) -> String {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn empty_clone_is_an_error_with_status_200() {
    setup_test_logger();
    let dir = TempDir::new().unwrap();

    for body in [r#"{"repo_url":"   "}"#, "{}"] {
        let app = test_app(&dir, sh_tools("true", "true"));
        let (status, json) = post_json(app, "/clone_repo", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Empty repo_url.");
    }
    assert!(!dir.path().join("repo_url.txt").exists());
}

#[tokio::test]
async fn malformed_clone_body_is_an_error_with_status_200() {
    let dir = TempDir::new().unwrap();

    for content_type in ["application/json", "text/plain"] {
        let response = test_app(&dir, sh_tools("true", "true"))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/clone_repo")
                    .header("content-type", content_type)
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
    }
    assert!(!dir.path().join("repo_url.txt").exists());
}

#[tokio::test]
async fn missing_tool_is_reported_in_body() {
    let dir = TempDir::new().unwrap();
    let mut tools = sh_tools("true", "true");
    tools.supervisor = repodoc::config::ToolCommand::new("repodoc-no-such-supervisor", &[]);

    let (status, json) = post_json(test_app(&dir, tools), "/generate_docs", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("repodoc-no-such-supervisor"));
}

#[cfg(unix)]
#[tokio::test]
async fn clone_then_map_use_the_saved_reference() {
    let dir = TempDir::new().unwrap();
    let tools = sh_tools("echo \"mapped $REPO_URL\"", "true");

    let (_, json) = post_json(
        test_app(&dir, tools.clone()),
        "/clone_repo",
        r#"{"repo_url":"https://github.com/a/b"}"#,
    )
    .await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["output"], "mapped https://github.com/a/b\n");

    let (_, json) = post_json(test_app(&dir, tools), "/map_repo", "").await;
    assert_eq!(json["output"], "mapped https://github.com/a/b\n");
}

#[cfg(unix)]
#[tokio::test]
async fn generate_without_report_returns_placeholder() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, sh_tools("true", "echo supervising"));

    let (_, json) = post_json(app, "/generate_docs", "").await;
    let response: ServiceResponse = serde_json::from_value(json).unwrap();
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.output.as_deref(), Some("supervising\n"));
    assert_eq!(response.markdown.as_deref(), Some("⚠️ No documentation file found."));
}

#[tokio::test]
async fn health_reports_store_dir() {
    let dir = TempDir::new().unwrap();
    let body = get_text(test_app(&dir, sh_tools("true", "true")), "/health").await;
    let json: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["store_dir"], dir.path().display().to_string());
}

#[tokio::test]
async fn report_page_renders_cleaned_document() {
    let dir = TempDir::new().unwrap();
    write_artifact(&dir, "ai_summary.md", "Short **summary**.");
    write_artifact(&dir, "repo_structure.txt", "src/\n  <main>.rs");
    write_artifact(
        &dir,
        "final_documentation.md",
        "# Docs\n\n## Contributing\nSend patches.\n## Usage\nrun it\n\n```mermaid\ngraph TD\nA-->B\n```\n",
    );

    let html = get_text(test_app(&dir, sh_tools("true", "true")), "/report").await;

    assert!(html.contains("<strong>summary</strong>"));
    assert!(html.contains("&lt;main&gt;.rs"));
    assert!(!html.contains("Send patches."));
    assert!(html.contains("<summary><b>Usage</b></summary>"));
    assert!(html.contains("<div class=\"mermaid\">\ngraph TD\nA--&gt;B\n</div>"));
}

#[tokio::test]
async fn report_page_shows_placeholders_for_missing_artifacts() {
    let dir = TempDir::new().unwrap();
    let html = get_text(test_app(&dir, sh_tools("true", "true")), "/report").await;

    assert!(html.contains("(File ai_summary.md not generated in time.)"));
    assert!(html.contains("(File final_documentation.md not generated in time.)"));
}

#[cfg(unix)]
#[tokio::test]
async fn client_drives_a_live_service() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        &dir,
        sh_tools("true", "printf '# Docs for %s' \"$REPO_URL\" > final_documentation.md"),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = repodoc::DocsClient::new(&format!("http://{}", addr)).unwrap();
    let response = client.run("https://github.com/a/b").await.unwrap();

    assert_eq!(response.markdown.as_deref(), Some("# Docs for https://github.com/a/b"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("repo_url.txt")).unwrap(),
        "https://github.com/a/b"
    );
}
