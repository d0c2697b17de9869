//! Projects service client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::client::ServiceClient;
use crate::api::types::{ComponentUpdate, TaskUpdate};
use crate::api::ProjectService;
use crate::error::Result;

/// Client for the projects service.
#[derive(Debug, Clone)]
pub struct ProjectsClient {
    http: ServiceClient,
}

impl ProjectsClient {
    /// Create a client rooted at `endpoint`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new("projects", endpoint, timeout)?,
        })
    }

    /// `PATCH /tasks/{id}`.
    pub async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Value> {
        self.patch("tasks", task_id, update).await
    }

    /// `PATCH /components/{id}`.
    pub async fn update_component(
        &self,
        component_id: &str,
        update: &ComponentUpdate,
    ) -> Result<Value> {
        self.patch("components", component_id, update).await
    }

    async fn patch<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &str,
        body: &T,
    ) -> Result<Value> {
        let url = self.http.url(&[collection, id])?;
        tracing::debug!("PATCH {}", url);

        let response = self.http.http().patch(url).json(body).send().await?;
        self.http.read_json(response).await
    }
}

#[async_trait]
impl ProjectService for ProjectsClient {
    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Value> {
        ProjectsClient::update_task(self, task_id, update).await
    }

    async fn update_component(
        &self,
        component_id: &str,
        update: &ComponentUpdate,
    ) -> Result<Value> {
        ProjectsClient::update_component(self, component_id, update).await
    }
}
