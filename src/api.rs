//! HTTP endpoints for the documentation service.
//!
//! Every operation answers with HTTP 200 and a JSON body whose `status` field
//! says whether it worked, so clients only ever inspect the body.

use crate::config::Config;
use crate::error::{DocgenError, Result};
use crate::orchestrator::DocService;
use crate::presentation;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::{Html, Json as ResponseJson},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Request payload for `/clone_repo`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneRequest {
    /// Repository URL to document
    #[serde(default)]
    pub repo_url: String,
}

/// Outcome of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The operation ran
    Success,
    /// The operation was rejected or could not start
    Error,
}

/// Body returned by every operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Whether the operation ran
    pub status: ResponseStatus,
    /// Standard output of the tool that ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Merged report, for generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Failure description when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResponse {
    /// Successful response carrying tool output
    pub fn success(output: String) -> Self {
        Self {
            status: ResponseStatus::Success,
            output: Some(output),
            markdown: None,
            error: None,
        }
    }

    /// Error response
    pub fn error(message: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            output: None,
            markdown: None,
            error: Some(message),
        }
    }

    fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(e) => {
                error!("Operation failed: {}", e);
                Self::error(error_text(&e))
            }
        }
    }
}

/// Message shown to clients; validation messages go out without their prefix
fn error_text(err: &DocgenError) -> String {
    match err {
        DocgenError::Validation(msg) | DocgenError::Message(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    service: Arc<DocService>,
    poll: presentation::PollSettings,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// State around an existing service
    pub fn new(service: DocService, poll: presentation::PollSettings) -> Self {
        Self {
            service: Arc::new(service),
            poll,
            started_at: Utc::now(),
        }
    }

    /// State built from a full configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DocService::from_config(config),
            presentation::PollSettings::from(&config.ui),
        )
    }
}

/// Create the main application with all routes
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/report", get(report))
        .route("/clone_repo", post(clone_repo))
        .route("/map_repo", post(map_repo))
        .route("/generate_docs", post(generate_docs))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process stops
pub async fn serve(config: Config) -> Result<()> {
    config.ensure_directories_exist().await?;
    let addr = config.server.addr()?;
    let app = create_app(AppState::from_config(&config));

    info!("Artifact directory: {}", config.store_dir.display());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Root endpoint - returns basic service information
async fn index() -> ResponseJson<Value> {
    ResponseJson(json!({
        "service": "repodoc",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Turn a source repository into a merged, AI-summarised markdown report",
        "endpoints": {
            "clone": "/clone_repo",
            "map": "/map_repo",
            "generate": "/generate_docs",
            "report": "/report",
            "health": "/health"
        }
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> ResponseJson<Value> {
    ResponseJson(json!({
        "service": "repodoc",
        "status": "healthy",
        "timestamp": Utc::now(),
        "uptime": (Utc::now() - state.started_at).num_seconds(),
        "store_dir": state.service.store().root().display().to_string(),
    }))
}

async fn clone_repo(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CloneRequest>, JsonRejection>,
) -> ResponseJson<ServiceResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Rejected clone request: {}", rejection.body_text());
            return ResponseJson(ServiceResponse::error(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )));
        }
    };
    info!("Clone requested for '{}'", request.repo_url);
    ResponseJson(ServiceResponse::from_result(
        state.service.clone_repo(&request.repo_url).await,
    ))
}

async fn map_repo(State(state): State<AppState>) -> ResponseJson<ServiceResponse> {
    ResponseJson(ServiceResponse::from_result(state.service.map_repo().await))
}

async fn generate_docs(State(state): State<AppState>) -> ResponseJson<ServiceResponse> {
    match state.service.generate_docs().await {
        Ok(report) => ResponseJson(ServiceResponse {
            status: ResponseStatus::Success,
            output: Some(report.output),
            markdown: Some(report.markdown),
            error: None,
        }),
        Err(e) => {
            error!("Generate failed: {}", e);
            ResponseJson(ServiceResponse::error(error_text(&e)))
        }
    }
}

/// Renders the current merged report as an HTML page
async fn report(State(state): State<AppState>) -> Html<String> {
    let poller = presentation::ArtifactPoller::new(state.service.store().clone(), state.poll);
    Html(presentation::ReportPage::collect(&poller).await.render())
}
