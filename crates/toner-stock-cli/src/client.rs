// toner-stock-cli/src/client.rs
// ============================================================================
// Module: Toner API Client
// Description: HTTP client for the toner list, add, and edit routes.
// Purpose: Let the CLI manage inventory against a running server.
// Dependencies: reqwest, serde, serde_json, toner-stock-core
// ============================================================================

//! ## Overview
//! [`TonerApiClient`] calls the three toner routes over HTTP. Responses are
//! untrusted: success payloads are safe-parsed back into [`TonerRecord`]s and
//! error payloads are decoded into [`ClientError::Api`] with the server's
//! error kind and message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Method;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use toner_stock_core::ALL_TONERS_TOKEN;
use toner_stock_core::TonerRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Toner API client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL could not be used.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    /// Request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(String),
    /// Server answered with an error status.
    #[error("server returned {status} ({kind}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error kind label reported by the server.
        kind: String,
        /// Error message reported by the server.
        message: String,
    },
    /// Server answered with a payload that is not a toner record.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Error body produced by the server.
#[derive(Deserialize)]
struct ApiErrorBody {
    /// Error kind label.
    error: String,
    /// Human-readable message.
    message: String,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one toner server.
#[derive(Debug, Clone)]
pub struct TonerApiClient {
    /// Server base URL.
    base_url: Url,
    /// Underlying HTTP client.
    http: reqwest::Client,
}

impl TonerApiClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when the URL does not parse or is
    /// not http(s), and [`ClientError::Transport`] when the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let trimmed = base_url.trim();
        let url = Url::parse(trimmed)
            .map_err(|err| ClientError::InvalidUrl(format!("{trimmed}: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{trimmed}: expected an http:// or https:// base url"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            base_url: url,
            http,
        })
    }

    /// Fetches every toner record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the listing is not
    /// an array of valid records.
    pub async fn list(&self) -> Result<Vec<TonerRecord>, ClientError> {
        let url = self.endpoint(&["toner", ALL_TONERS_TOKEN])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let body = read_success(response).await?;
        let Value::Array(items) = body else {
            return Err(ClientError::Decode("expected an array of toner records".to_string()));
        };
        items
            .iter()
            .map(|item| {
                TonerRecord::safe_parse(item).map_err(|err| ClientError::Decode(err.to_string()))
            })
            .collect()
    }

    /// Creates a toner record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the server rejects it.
    pub async fn add(&self, record: &TonerRecord) -> Result<TonerRecord, ClientError> {
        self.submit(Method::POST, "add", record).await
    }

    /// Replaces an existing toner record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the server rejects it.
    pub async fn edit(&self, record: &TonerRecord) -> Result<TonerRecord, ClientError> {
        self.submit(Method::PUT, "put", record).await
    }

    /// Sends a record to `/toner/{id}/{action}`.
    async fn submit(
        &self,
        method: Method,
        action: &str,
        record: &TonerRecord,
    ) -> Result<TonerRecord, ClientError> {
        let url = self.endpoint(&["toner", record.id.as_str(), action])?;
        let response = self
            .http
            .request(method, url)
            .json(record)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let body = read_success(response).await?;
        TonerRecord::safe_parse(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Returns the JSON body of a 2xx response, or the decoded error.
async fn read_success(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|err| ClientError::Transport(err.to_string()))?;
    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()));
    }
    let (kind, message) = match serde_json::from_slice::<ApiErrorBody>(&bytes) {
        Ok(body) => (body.error, body.message),
        Err(_) => ("http".to_string(), String::from_utf8_lossy(&bytes).trim().to_string()),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        kind,
        message,
    })
}
