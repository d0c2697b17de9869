//! Configuration structures and loading logic.

use crate::config::modes::ProjectsResource;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default datasets service endpoint.
pub const DEFAULT_DATASETS_ENDPOINT: &str = "http://datasets.kubeflow:8080";

/// Default projects service endpoint.
pub const DEFAULT_PROJECTS_ENDPOINT: &str = "http://projects.kubeflow:8080";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub services: ServicesConfig,
}

/// Relay server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// URL prefix every route lives under.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Shared token clients must present, if any.
    #[serde(default)]
    pub token: Option<String>,

    /// Where uploads are kept before forwarding. Not persisted when unset.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    /// Largest accepted upload body.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_url: default_base_url(),
            token: None,
            upload_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Upstream service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Datasets service base URL.
    #[serde(default = "default_datasets_endpoint")]
    pub datasets_endpoint: String,

    /// Projects service base URL.
    #[serde(default = "default_projects_endpoint")]
    pub projects_endpoint: String,

    /// Collection that receives notebook updates.
    #[serde(default)]
    pub projects_resource: ProjectsResource,

    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            datasets_endpoint: default_datasets_endpoint(),
            projects_endpoint: default_projects_endpoint(),
            projects_resource: ProjectsResource::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8889".to_string()
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_max_upload_bytes() -> u64 {
    100 * 1024 * 1024
}

fn default_datasets_endpoint() -> String {
    DEFAULT_DATASETS_ENDPOINT.to_string()
}

fn default_projects_endpoint() -> String {
    DEFAULT_PROJECTS_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Route prefix with exactly one trailing slash.
    pub fn base_url(&self) -> String {
        let trimmed = self.server.base_url.trim_end_matches('/');
        format!("{}/", trimmed)
    }
}

/// Pick the configuration file to read.
///
/// An explicitly given path that exists wins. Otherwise the per-user config
/// directory is tried, then the given path is returned as-is.
pub fn resolve_config_path(requested: &Path) -> PathBuf {
    if requested.exists() {
        return requested.to_path_buf();
    }

    if let Some(dirs) = ProjectDirs::from("", "", "notebook-relay") {
        let fallback = dirs.config_dir().join("config.toml");
        if fallback.exists() {
            return fallback;
        }
    }

    requested.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8889");
        assert_eq!(config.server.base_url, "/");
        assert_eq!(config.services.datasets_endpoint, DEFAULT_DATASETS_ENDPOINT);
        assert_eq!(config.services.projects_endpoint, DEFAULT_PROJECTS_ENDPOINT);
        assert_eq!(config.services.projects_resource, ProjectsResource::Tasks);
        assert!(config.server.upload_dir.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[server]
base_url = "/user/alice"
upload_dir = "/tmp/uploads"

[services]
projects_endpoint = "http://localhost:9000"
projects_resource = "components"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url(), "/user/alice/");
        assert_eq!(config.server.upload_dir, Some(PathBuf::from("/tmp/uploads")));
        assert_eq!(config.services.projects_endpoint, "http://localhost:9000");
        assert_eq!(config.services.datasets_endpoint, DEFAULT_DATASETS_ENDPOINT);
        assert_eq!(
            config.services.projects_resource,
            ProjectsResource::Components
        );
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_save_round_trip_keeps_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = Config::default();
        config.server.token = Some("s3cret-token".into());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.token.as_deref(), Some("s3cret-token"));
    }

    #[test]
    fn test_base_url_normalization() {
        let mut config = Config::default();
        assert_eq!(config.base_url(), "/");
        config.server.base_url = "/lab///".into();
        assert_eq!(config.base_url(), "/lab/");
    }
}
