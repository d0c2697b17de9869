//! Relay HTTP server.
//!
//! Serves, under the configured base URL:
//! - `GET  api/datasets`  liveness probe, answers `pong`
//! - `POST api/datasets`  multipart CSV upload forwarded to the datasets service
//! - `POST api/post-save` save notification, runs the post-save hook

pub mod response;
pub mod routes;

use std::convert::Infallible;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::{DatasetService, DatasetsClient, ProjectService, ProjectsClient};
use crate::config::validation::validate_bind;
use crate::config::{Config, ProjectsResource};
use crate::error::Result;

pub use routes::{DATASETS_ROUTE, POST_SAVE_ROUTE};

/// Everything a request handler needs.
pub struct AppState {
    /// Route prefix, always ending in `/`.
    pub base_url: String,
    pub token: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: u64,
    pub projects_resource: ProjectsResource,
    pub datasets: Arc<dyn DatasetService>,
    pub projects: Arc<dyn ProjectService>,
}

impl AppState {
    /// Build state from configuration with the real service clients.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.services.timeout_seconds);
        let datasets = DatasetsClient::new(&config.services.datasets_endpoint, timeout)?;
        let projects = ProjectsClient::new(&config.services.projects_endpoint, timeout)?;

        Ok(Self::with_services(
            config,
            Arc::new(datasets),
            Arc::new(projects),
        ))
    }

    /// Build state from configuration with the given services.
    pub fn with_services(
        config: &Config,
        datasets: Arc<dyn DatasetService>,
        projects: Arc<dyn ProjectService>,
    ) -> Self {
        Self {
            base_url: config.base_url(),
            token: config.server.token.clone(),
            upload_dir: config.server.upload_dir.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
            projects_resource: config.services.projects_resource,
            datasets,
            projects,
        }
    }
}

/// Accept connections until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        let span = tracing::info_span!("request", id = %Uuid::new_v4());
                        async move { Ok::<_, Infallible>(routes::handle(state, req).await) }
                            .instrument(span)
                    });

                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        tracing::debug!("Connection from {} ended: {}", peer, e);
                    }
                });
            }
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: &Config) -> Result<()> {
    let addr = validate_bind(&config.server.bind)?;
    let state = Arc::new(AppState::from_config(config)?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        "Listening on http://{}{}{}",
        listener.local_addr()?,
        state.base_url,
        DATASETS_ROUTE
    );

    serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}
