//! Mapping notebook paths to projects-service tasks.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Which of a task's two notebooks was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotebookKind {
    Experiment,
    Deployment,
}

impl fmt::Display for NotebookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotebookKind::Experiment => write!(f, "experiment"),
            NotebookKind::Deployment => write!(f, "deployment"),
        }
    }
}

/// A task notebook identified from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub id: String,
    pub kind: NotebookKind,
}

fn task_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|/)tasks/([^/]+)/(Experiment|Deployment)\.ipynb$").unwrap()
    })
}

/// Identify the task a notebook belongs to.
///
/// Task notebooks live at `.../tasks/<id>/Experiment.ipynb` or
/// `.../tasks/<id>/Deployment.ipynb`. Anything else is not a task notebook.
pub fn locate_task(path: &Path) -> Option<TaskRef> {
    let path = path.to_string_lossy().replace('\\', "/");
    let captures = task_path_pattern().captures(&path)?;

    let id = captures.get(1)?.as_str();
    if id == "." || id == ".." {
        return None;
    }

    let kind = match captures.get(2)?.as_str() {
        "Experiment" => NotebookKind::Experiment,
        _ => NotebookKind::Deployment,
    };

    Some(TaskRef {
        id: id.to_string(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_experiment() {
        let task = locate_task(Path::new(
            "/home/jovyan/tasks/3fa85f64-5717-4562-b3fc-2c963f66afa6/Experiment.ipynb",
        ))
        .unwrap();
        assert_eq!(task.id, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(task.kind, NotebookKind::Experiment);
    }

    #[test]
    fn test_locate_relative_deployment() {
        let task = locate_task(Path::new("tasks/my-task/Deployment.ipynb")).unwrap();
        assert_eq!(task.id, "my-task");
        assert_eq!(task.kind, NotebookKind::Deployment);
    }

    #[test]
    fn test_windows_separators() {
        let task = locate_task(Path::new("C:\\work\\tasks\\abc\\Experiment.ipynb")).unwrap();
        assert_eq!(task.id, "abc");
    }

    #[test]
    fn test_non_task_paths() {
        assert!(locate_task(Path::new("notebooks/Experiment.ipynb")).is_none());
        assert!(locate_task(Path::new("tasks/abc/Untitled.ipynb")).is_none());
        assert!(locate_task(Path::new("tasks/abc/nested/Experiment.ipynb")).is_none());
        assert!(locate_task(Path::new("mytasks/abc/Experiment.ipynb")).is_none());
        assert!(locate_task(Path::new("tasks/../Experiment.ipynb")).is_none());
    }
}
