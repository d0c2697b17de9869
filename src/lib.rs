//! notebook-relay - dataset upload relay and notebook post-save hook.
//!
//! This library provides the pieces the `notebook-relay` binary is built from.
//!
//! # Features
//!
//! - Forward CSV uploads from the notebook frontend to the datasets service
//! - Push saved task notebooks and their parameters to the projects service
//! - Keep uploaded files locally under collision-free names
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use notebook_relay::fs::unique_filename;
//!
//! let name = unique_filename("relatório final.csv", Path::new("/data/uploads"))?;
//! assert!(name.starts_with("relatorio-final"));
//! # Ok::<(), notebook_relay::Error>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod hooks;
pub mod notebook;
pub mod output;
pub mod server;

// Re-exports for convenience
pub use api::{DatasetService, DatasetsClient, ProjectService, ProjectsClient};
pub use config::{Config, ProjectsResource};
pub use error::{Error, Result};
pub use hooks::{post_save, HookOutcome};
pub use server::AppState;
