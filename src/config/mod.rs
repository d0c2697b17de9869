//! Configuration module for the notebook relay.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument and environment merging
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    resolve_config_path, Config, ServerConfig, ServicesConfig, DEFAULT_DATASETS_ENDPOINT,
    DEFAULT_PROJECTS_ENDPOINT,
};
pub use modes::ProjectsResource;
pub use validation::{validate_config, validate_endpoint, validate_timeout};
