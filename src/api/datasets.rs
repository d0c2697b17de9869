//! Datasets service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::api::client::ServiceClient;
use crate::api::DatasetService;
use crate::error::Result;

/// Filename used for the upload part when the caller has none.
pub const DEFAULT_UPLOAD_NAME: &str = "file";

/// Client for the datasets service.
#[derive(Debug, Clone)]
pub struct DatasetsClient {
    http: ServiceClient,
}

impl DatasetsClient {
    /// Create a client rooted at `endpoint`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new("datasets", endpoint, timeout)?,
        })
    }

    /// Create a dataset from file contents.
    ///
    /// Sends `POST /datasets` with a single multipart part named `file` and
    /// returns the service's JSON description of the new dataset.
    pub async fn create_dataset(&self, file: Vec<u8>, filename: &str) -> Result<Value> {
        let filename = if filename.is_empty() {
            DEFAULT_UPLOAD_NAME
        } else {
            filename
        };
        let mime = mime_guess::from_path(filename).first_or_octet_stream();

        let part = Part::bytes(file)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);

        let url = self.http.url(&["datasets"])?;
        tracing::debug!("POST {} ({})", url, filename);

        let response = self.http.http().post(url).multipart(form).send().await?;
        self.http.read_json(response).await
    }
}

#[async_trait]
impl DatasetService for DatasetsClient {
    async fn create_dataset(&self, file: Vec<u8>, filename: &str) -> Result<Value> {
        DatasetsClient::create_dataset(self, file, filename).await
    }
}
