//! Shared HTTP plumbing for the upstream services.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

use crate::config::validation::validate_endpoint;
use crate::error::{Error, Result};

/// User agent sent with every upstream request.
const USER_AGENT: &str = concat!("notebook-relay/", env!("CARGO_PKG_VERSION"));

/// Characters of an unparseable reply kept in the error.
const PREVIEW_CHARS: usize = 500;

/// HTTP client bound to one upstream service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base: Url,
    service: &'static str,
}

impl ServiceClient {
    /// Create a client for `service` rooted at `endpoint`.
    pub fn new(service: &'static str, endpoint: &str, timeout: Duration) -> Result<Self> {
        let base = validate_endpoint(&format!("{}_endpoint", service), endpoint)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Service(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            service,
        })
    }

    /// Name of the service, for logs and errors.
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Underlying reqwest client.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Build a URL under the service root from path segments.
    ///
    /// Segments are percent-encoded, so identifiers cannot escape their slot.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Service(format!("{} endpoint cannot be used as a base URL", self.service))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fail with [`Error::UpstreamStatus`] unless the response is 2xx.
    pub async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("{} response status: {}", self.service, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("{} service returned HTTP {}: {}", self.service, status, body);
        Err(Error::UpstreamStatus {
            service: self.service,
            status,
            body,
        })
    }

    /// Check the status and decode the JSON reply.
    pub async fn read_json(&self, response: Response) -> Result<Value> {
        let response = self.check_status(response).await?;
        let text = response.text().await?;
        tracing::debug!("{} response: {}", self.service, text);

        serde_json::from_str(&text).map_err(|e| {
            Error::Service(format!(
                "Failed to parse {} response: {} - Response: {}",
                self.service,
                e,
                preview(&text)
            ))
        })
    }
}

/// First `PREVIEW_CHARS` characters of a reply body, for error messages.
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
