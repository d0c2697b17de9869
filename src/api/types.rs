//! Request bodies sent to the projects service.

use serde::Serialize;
use serde_json::Value;

use crate::notebook::Parameter;

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_notebook: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_notebook: Option<Value>,
}

/// Body of `PATCH /components/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_notebook: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_notebook: Option<Value>,
}

impl From<TaskUpdate> for ComponentUpdate {
    fn from(update: TaskUpdate) -> Self {
        Self {
            experiment_notebook: update.experiment_notebook,
            deployment_notebook: update.deployment_notebook,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_omitted() {
        let update = ComponentUpdate {
            experiment_notebook: Some(json!({"cells": []})),
            deployment_notebook: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"experimentNotebook": {"cells": []}})
        );
        assert_eq!(serde_json::to_value(ComponentUpdate::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_task_update_into_component_update() {
        let task = TaskUpdate {
            parameters: Some(Vec::new()),
            experiment_notebook: None,
            deployment_notebook: Some(json!({"nbformat": 4})),
        };
        let component: ComponentUpdate = task.into();
        assert_eq!(
            serde_json::to_value(&component).unwrap(),
            json!({"deploymentNotebook": {"nbformat": 4}})
        );
    }
}
