//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    validate_config, validate_endpoint, validate_timeout, Config, ProjectsResource,
};
use crate::error::Result;

/// Notebook relay CLI.
#[derive(Parser, Debug)]
#[command(
    name = "notebook-relay",
    version,
    about = "Relay dataset uploads and notebook saves to the platform services",
    long_about = "Runs next to a notebook server. Forwards CSV uploads from the notebook \
                  frontend to the datasets service and pushes saved task notebooks to the \
                  projects service."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Datasets service base URL.
    #[arg(long, env = "DATASETS_ENDPOINT", global = true)]
    pub datasets_endpoint: Option<String>,

    /// Projects service base URL.
    #[arg(long, env = "PROJECTS_ENDPOINT", global = true)]
    pub projects_endpoint: Option<String>,

    /// Projects collection that receives notebook updates (tasks or components).
    #[arg(long, global = true)]
    pub projects_resource: Option<ProjectsResource>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay HTTP server.
    Serve(ServeArgs),

    /// Run the post-save hook for one saved file.
    PostSave {
        /// Content model type of the saved file.
        #[arg(long = "type", default_value = "notebook")]
        model_type: String,

        /// Path of the saved file.
        path: PathBuf,
    },

    /// Create a dataset from a local file.
    Upload {
        /// File to upload.
        file: PathBuf,

        /// Name to send instead of the file's own name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a collision-free name for a file in a directory.
    UniqueName {
        /// Desired filename.
        filename: String,

        /// Target directory.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Server overrides.
#[derive(ClapArgs, Debug, Default)]
pub struct ServeArgs {
    /// Socket address to listen on.
    #[arg(short, long)]
    pub bind: Option<String>,

    /// URL prefix for all routes.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Keep uploaded files in this directory.
    #[arg(short, long)]
    pub upload_dir: Option<PathBuf>,

    /// Token clients must present.
    #[arg(long, env = "RELAY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Command {
    /// Validate the parts of `config` this command relies on.
    ///
    /// `unique-name` works on the local filesystem only, so it needs none.
    pub fn validate(&self, config: &Config) -> Result<()> {
        match self {
            Command::Serve(_) => validate_config(config),
            Command::PostSave { .. } => {
                validate_endpoint("projects_endpoint", &config.services.projects_endpoint)?;
                validate_timeout(config.services.timeout_seconds)
            }
            Command::Upload { .. } => {
                validate_endpoint("datasets_endpoint", &config.services.datasets_endpoint)?;
                validate_timeout(config.services.timeout_seconds)
            }
            Command::UniqueName { .. } => Ok(()),
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(endpoint) = &self.datasets_endpoint {
            config.services.datasets_endpoint = endpoint.clone();
        }

        if let Some(endpoint) = &self.projects_endpoint {
            config.services.projects_endpoint = endpoint.clone();
        }

        if let Some(resource) = self.projects_resource {
            config.services.projects_resource = resource;
        }

        if let Command::Serve(serve) = &self.command {
            if let Some(bind) = &serve.bind {
                config.server.bind = bind.clone();
            }

            if let Some(base_url) = &serve.base_url {
                config.server.base_url = base_url.clone();
            }

            if let Some(dir) = &serve.upload_dir {
                config.server.upload_dir = Some(dir.clone());
            }

            if let Some(token) = &serve.token {
                config.server.token = Some(token.clone());
            }
        }
    }
}
