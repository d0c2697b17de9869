//! Notebook post-save hook.
//!
//! After a task notebook is saved, its content (and, for experiment
//! notebooks, its declared parameters) is pushed to the projects service.
//! Upstream failures are logged and reported, never raised: a failed sync must
//! not turn into a failed save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::{ProjectService, TaskUpdate};
use crate::config::ProjectsResource;
use crate::error::{Error, Result};
use crate::notebook::{locate_task, parse_parameters, Notebook, NotebookKind};

/// Content model type the hook acts on.
pub const NOTEBOOK_MODEL: &str = "notebook";

/// A save notification, as posted by the notebook server.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveEvent {
    /// Content model type, e.g. `notebook`, `file`, `directory`.
    #[serde(rename = "type")]
    pub model_type: String,

    /// Filesystem path of the saved file.
    pub path: PathBuf,
}

/// Why nothing was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotANotebook,
    NoTask,
}

/// What the hook did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HookOutcome {
    Skipped {
        reason: SkipReason,
    },
    Updated {
        task_id: String,
        resource: String,
        parameters: usize,
    },
    Failed {
        task_id: String,
        reason: String,
    },
}

/// Run the hook for one saved file.
pub async fn post_save(
    model_type: &str,
    path: &Path,
    projects: &dyn ProjectService,
    resource: ProjectsResource,
) -> Result<HookOutcome> {
    if model_type != NOTEBOOK_MODEL {
        tracing::debug!("Ignoring save of {} ({})", path.display(), model_type);
        return Ok(HookOutcome::Skipped {
            reason: SkipReason::NotANotebook,
        });
    }

    let Some(task) = locate_task(path) else {
        tracing::debug!("{} is not a task notebook", path.display());
        return Ok(HookOutcome::Skipped {
            reason: SkipReason::NoTask,
        });
    };

    let owned = path.to_path_buf();
    let notebook = tokio::task::spawn_blocking(move || Notebook::load(&owned))
        .await
        .map_err(|e| Error::Notebook(format!("Notebook read task failed: {}", e)))??;

    let mut update = TaskUpdate::default();
    let mut parameter_count = 0;
    match task.kind {
        NotebookKind::Experiment => {
            // Components carry no parameters.
            if resource == ProjectsResource::Tasks {
                let parameters = parse_parameters(&notebook);
                parameter_count = parameters.len();
                update.parameters = Some(parameters);
            }
            update.experiment_notebook = Some(notebook.into_json());
        }
        NotebookKind::Deployment => {
            update.deployment_notebook = Some(notebook.into_json());
        }
    }

    tracing::info!(
        "Syncing {} notebook of {} {} ({} parameters)",
        task.kind,
        resource,
        task.id,
        parameter_count
    );

    let result = match resource {
        ProjectsResource::Tasks => projects.update_task(&task.id, &update).await,
        ProjectsResource::Components => {
            projects.update_component(&task.id, &update.into()).await
        }
    };

    match result {
        Ok(_) => Ok(HookOutcome::Updated {
            task_id: task.id,
            resource: resource.to_string(),
            parameters: parameter_count,
        }),
        Err(e) if e.is_upstream() => {
            tracing::error!("Connection failure:\n{}", e);
            Ok(HookOutcome::Failed {
                task_id: task.id,
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}
