use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// `repodoc` isolated from the user's config file and API keys
fn repodoc(store: &TempDir, home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("repodoc").expect("binary not found");
    cmd.env("REPODOC_STORE_DIR", store.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("REPODOC_LLM_PROVIDER");
    cmd
}

#[test]
fn merge_writes_final_documentation() {
    let store = TempDir::new().expect("failed to create store");
    let home = TempDir::new().expect("failed to create home");
    fs::write(
        store.path().join("repo_readme.txt"),
        "# Tool\n\nRun pip install tool first.\nThen run it.\n",
    )
    .expect("failed to write README");
    fs::write(store.path().join("ai_summary.md"), "A tool.").expect("failed to write summary");

    repodoc(&store, &home)
        .arg("--merge")
        .assert()
        .success()
        .stdout(predicate::str::contains("final_documentation.md"));

    let merged = fs::read_to_string(store.path().join("final_documentation.md"))
        .expect("merge did not write final_documentation.md");
    assert!(merged.contains("A tool."));
    assert!(merged.contains("Run pip install tool first."));
    assert!(merged.contains("_No AI overview generated._"));
    assert!(merged.contains("(No code analysis found)"));
    assert!(!merged.contains("```mermaid"));
}

#[test]
fn merge_on_empty_store_uses_placeholders() {
    let store = TempDir::new().expect("failed to create store");
    let home = TempDir::new().expect("failed to create home");

    repodoc(&store, &home).arg("--merge").assert().success();

    let merged = fs::read_to_string(store.path().join("final_documentation.md")).unwrap();
    assert!(merged.contains("_Gemini summary unavailable._"));
    assert!(merged.contains("_See README for detailed installation instructions._"));
    assert!(merged.contains("_See README for usage examples._"));
}

#[test]
fn summarize_without_api_key_fails_fast() {
    let store = TempDir::new().expect("failed to create store");
    let home = TempDir::new().expect("failed to create home");
    fs::write(store.path().join("repo_readme.txt"), "# Tool").unwrap();

    repodoc(&store, &home)
        .args(["summarize", "readme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_API_KEY not found"));

    assert!(!store.path().join("ai_summary.md").exists());
}

#[test]
fn generate_rejects_empty_url() {
    let store = TempDir::new().expect("failed to create store");
    let home = TempDir::new().expect("failed to create home");

    repodoc(&store, &home)
        .args(["generate", "  "])
        .env("REPODOC_BACKEND_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid repository URL."));
}

#[test]
fn missing_config_file_is_an_error() {
    let store = TempDir::new().expect("failed to create store");
    let home = TempDir::new().expect("failed to create home");

    repodoc(&store, &home)
        .args(["--config", "/nonexistent/repodoc.toml", "--merge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
