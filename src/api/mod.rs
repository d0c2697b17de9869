//! Upstream service clients.
//!
//! This module provides:
//! - Shared HTTP plumbing (URL building, status checks)
//! - The datasets client (CSV upload)
//! - The projects client (task and component updates)
//! - Service traits the server and hooks are written against

pub mod client;
pub mod datasets;
pub mod projects;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use client::ServiceClient;
pub use datasets::{DatasetsClient, DEFAULT_UPLOAD_NAME};
pub use projects::ProjectsClient;
pub use types::{ComponentUpdate, TaskUpdate};

/// Something that turns an uploaded file into a dataset.
#[async_trait]
pub trait DatasetService: Send + Sync {
    async fn create_dataset(&self, file: Vec<u8>, filename: &str) -> Result<Value>;
}

/// Something that stores notebook updates for tasks and components.
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Value>;

    async fn update_component(
        &self,
        component_id: &str,
        update: &ComponentUpdate,
    ) -> Result<Value>;
}
