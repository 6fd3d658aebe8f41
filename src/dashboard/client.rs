//! HTTP client for the apps API
//!
//! [`AppsApi`] is the seam the refresher depends on; [`HttpApiClient`] is the
//! reqwest-backed implementation used by the `dashboard` command.

use crate::models::App;
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure to fetch or decode an API response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        /// Message from a `{ "error": ... }` body, when the server sent one
        body: Option<String>,
    },

    /// The request was sent but nothing came back (refused, reset, timed out)
    #[error("no response: {0}")]
    NoResponse(String),

    /// The body was not the JSON shape we expected
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Build from a transport-level reqwest error
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::from_status(status, "")
        } else if err.is_timeout() || err.is_connect() || err.is_request() {
            FetchError::NoResponse(err.to_string())
        } else {
            FetchError::Other(err.to_string())
        }
    }

    /// Build from a non-2xx response and its body
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        FetchError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: serde_json::from_str::<ErrorBody>(body)
                .ok()
                .map(|parsed| parsed.error),
        }
    }

    /// Human-readable message for the error banner
    pub fn classify(&self) -> String {
        match self {
            FetchError::Status { status: 404, .. } => "endpoint not found".to_string(),
            FetchError::Status {
                status,
                status_text,
                ..
            } if *status >= 500 => format!("server error: {} {}", status, status_text)
                .trim_end()
                .to_string(),
            FetchError::Status {
                status,
                status_text,
                ..
            } => format!("request failed: {} {}", status, status_text)
                .trim_end()
                .to_string(),
            FetchError::NoResponse(_) => "no response from server".to_string(),
            FetchError::Decode(message) | FetchError::Other(message) => {
                if message.trim().is_empty() {
                    "unexpected error".to_string()
                } else {
                    message.clone()
                }
            }
        }
    }
}

/// The part of `/api/config` the dashboard renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub header_background: Option<String>,

    #[serde(default)]
    pub header_foreground: Option<String>,

    #[serde(default)]
    pub instance_name: String,
}

fn default_title() -> String {
    "Forecastle".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            header_background: None,
            header_foreground: None,
            instance_name: String::new(),
        }
    }
}

/// Read-only access to the apps API
#[async_trait]
pub trait AppsApi: Send + Sync {
    /// Fetch the full application list
    async fn fetch_apps(&self) -> Result<Vec<App>, FetchError>;

    /// Fetch the display configuration
    async fn fetch_config(&self) -> Result<DisplayConfig, FetchError>;
}

/// reqwest-backed [`AppsApi`]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Create a client for the server at `base_url`
    ///
    /// A base path on the URL (e.g. `http://host/forecastle`) is kept.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::debug!("Created API client for: {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::Other(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        tracing::debug!("Fetching data from: {}", url);

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = FetchError::from_status(status, &body);
            tracing::debug!(url = %url, error = ?err, "Request failed");
            return Err(err);
        }

        let bytes = resp.bytes().await.map_err(FetchError::from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AppsApi for HttpApiClient {
    async fn fetch_apps(&self) -> Result<Vec<App>, FetchError> {
        // A JSON null is an empty list
        let apps: Option<Vec<App>> = self.get_json("api/apps").await?;
        Ok(apps.unwrap_or_default())
    }

    async fn fetch_config(&self) -> Result<DisplayConfig, FetchError> {
        self.get_json("api/config").await
    }
}
