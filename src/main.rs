//! notebook-relay - CLI entry point.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use notebook_relay::{
    api::{DatasetsClient, ProjectsClient, DEFAULT_UPLOAD_NAME},
    cli::{Args, Command},
    config::{resolve_config_path, Config},
    error::{exit_codes, Error, Result},
    fs::{sanitize_upload_name, unique_filename},
    hooks::post_save,
    output::{
        create_spinner, print_banner, print_error, print_hook_outcome, print_info,
        print_server_summary, print_success, print_warning,
    },
    server,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::TomlParse(_) | Error::UrlParse(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                ref e if e.is_upstream() => ExitCode::from(exit_codes::SERVICE_ERROR as u8),
                Error::Io(_) | Error::InvalidFilename(_) | Error::NamesExhausted { .. } => {
                    ExitCode::from(exit_codes::STORAGE_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load configuration
    let config_path = resolve_config_path(&args.config);
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    // Merge CLI arguments and environment into config
    args.merge_into_config(&mut config);

    // Validate what the chosen command needs
    args.command.validate(&config)?;

    let timeout = Duration::from_secs(config.services.timeout_seconds);

    match args.command {
        Command::Serve(_) => {
            print_banner();
            if !config_path.exists() {
                print_warning(&format!(
                    "Configuration file not found: {}",
                    config_path.display()
                ));
                print_info("Using default configuration with CLI arguments");
            }
            let upload_dir = config
                .server
                .upload_dir
                .as_ref()
                .map(|d| d.display().to_string());
            print_server_summary(
                &config.server.bind,
                &config.services.datasets_endpoint,
                &config.services.projects_endpoint,
                upload_dir.as_deref(),
            );
            server::run(&config).await
        }
        Command::PostSave { model_type, path } => {
            let projects = ProjectsClient::new(&config.services.projects_endpoint, timeout)?;
            let outcome = post_save(
                &model_type,
                &path,
                &projects,
                config.services.projects_resource,
            )
            .await?;
            print_hook_outcome(&outcome);
            Ok(())
        }
        Command::Upload { file, name } => upload(&config, &file, name, timeout).await,
        Command::UniqueName { filename, dir } => {
            println!("{}", unique_filename(&filename, &dir)?);
            Ok(())
        }
    }
}

/// Send a local file to the datasets service.
async fn upload(config: &Config, file: &Path, name: Option<String>, timeout: Duration) -> Result<()> {
    let bytes = tokio::fs::read(file).await?;

    let name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string()),
    };
    let name = sanitize_upload_name(&name)?;

    let datasets = DatasetsClient::new(&config.services.datasets_endpoint, timeout)?;

    let spinner = create_spinner(&format!("Uploading {} ({} bytes)...", name, bytes.len()));
    let result = datasets.create_dataset(bytes, &name).await;
    spinner.finish_and_clear();

    let dataset = result?;
    let label = dataset
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or(&name)
        .to_string();
    print_success(&format!("Created dataset {}", label));
    println!("{}", serde_json::to_string_pretty(&dataset)?);
    Ok(())
}
