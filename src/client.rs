//! Client side of the documentation service.

use crate::api::{CloneRequest, ResponseStatus, ServiceResponse};
use crate::error::{DocgenError, Result};
use reqwest::Client;
use std::time::Duration;

/// Shown when the URL field is empty
pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid repository URL.";

/// Talks to a running documentation service over HTTP
#[derive(Debug, Clone)]
pub struct DocsClient {
    http: Client,
    base_url: String,
}

impl DocsClient {
    /// Client for the service at `base_url`
    ///
    /// Requests carry no timeout since the tools behind them run unbounded.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("repodoc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /clone_repo`
    pub async fn clone_repo(&self, repo_url: &str) -> Result<ServiceResponse> {
        let request = CloneRequest {
            repo_url: repo_url.to_string(),
        };
        self.post("clone_repo", Some(&request)).await
    }

    /// `POST /generate_docs`
    pub async fn generate_docs(&self) -> Result<ServiceResponse> {
        self.post::<()>("generate_docs", None).await
    }

    /// Clone followed by generate
    ///
    /// The clone response is only logged; generate decides the outcome.
    pub async fn run(&self, repo_url: &str) -> Result<ServiceResponse> {
        if repo_url.trim().is_empty() {
            return Err(DocgenError::Validation(EMPTY_URL_MESSAGE.to_string()));
        }

        let cloned = self.clone_repo(repo_url.trim()).await?;
        if cloned.status != ResponseStatus::Success {
            log::warn!(
                "Clone reported an error: {}",
                cloned.error.as_deref().unwrap_or("unknown")
            );
        }

        let generated = self.generate_docs().await?;
        if generated.status != ResponseStatus::Success {
            return Err(DocgenError::Message(format!(
                "Backend error: {}",
                generated.error.as_deref().unwrap_or("Unknown error")
            )));
        }
        Ok(generated)
    }

    async fn post<T: serde::Serialize>(&self, path: &str, body: Option<&T>) -> Result<ServiceResponse> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("POST {}", url);

        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<ServiceResponse>().await?)
    }
}
