//! Notebook module.
//!
//! Provides:
//! - A minimal nbformat model
//! - Parameter discovery in `parameters` cells
//! - Task lookup from notebook paths

pub mod model;
pub mod parameters;
pub mod task;

pub use model::{Cell, Notebook, Source};
pub use parameters::{parse_parameters, Parameter, PARAMETERS_TAG};
pub use task::{locate_task, NotebookKind, TaskRef};
