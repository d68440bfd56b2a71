//! Transport seam between the checker and the licensing server.
//!
//! One operation: submit a check request, get back the raw signed response
//! text. The checker does all verification; a transport implementation is
//! just plumbing and is trivially mockable in tests.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A license check request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Fresh random nonce; the response must echo it.
    pub nonce: u64,
    /// The app id being checked.
    #[serde(rename = "app")]
    pub app_id: String,
    /// The installed app version.
    #[serde(rename = "ver")]
    pub version: String,
    /// Opaque account identifier.
    #[serde(rename = "uid")]
    pub user_id: String,
}

/// Submits check requests to a licensing server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submits a request and returns the raw signed response text.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the server cannot be reached or
    /// answers with a non-success status.
    async fn submit(&self, request: &CheckRequest) -> ClientResult<String>;
}

/// HTTP transport against a licensing server endpoint.
#[cfg(feature = "online")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "online")]
impl HttpTransport {
    /// Creates a transport posting to `endpoint` (the full check URL).
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "online")]
#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, request: &CheckRequest) -> ClientResult<String> {
        tracing::debug!(endpoint = %self.endpoint, nonce = request.nonce, "submitting check");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "server answered with status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}
