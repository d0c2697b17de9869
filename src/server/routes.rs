//! Request routing and handlers.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};

use crate::api::{DatasetService, DEFAULT_UPLOAD_NAME};
use crate::fs::{normalize_filename, sanitize_upload_name, save_upload};
use crate::hooks::{post_save, SaveEvent};
use crate::server::response::{
    json_error, json_response, method_not_allowed, not_found, text_response, BoxBody,
};
use crate::server::AppState;

/// Route for dataset uploads, relative to the base URL.
pub const DATASETS_ROUTE: &str = "api/datasets";

/// Route for save notifications, relative to the base URL.
pub const POST_SAVE_ROUTE: &str = "api/post-save";

/// Largest accepted save notification body.
const MAX_EVENT_BYTES: usize = 64 * 1024;

const UPLOAD_FAILED: &str = "Unable to create a dataset from file";

/// An uploaded file pulled out of a multipart body.
#[derive(Debug)]
struct UploadedFile {
    filename: Option<String>,
    bytes: Bytes,
}

#[derive(Debug)]
enum UploadError {
    InvalidMultipart(String),
    PayloadTooLarge(String),
}

impl From<multer::Error> for UploadError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
                UploadError::PayloadTooLarge(err.to_string())
            }
            other => UploadError::InvalidMultipart(other.to_string()),
        }
    }
}

/// Dispatch one request.
pub async fn handle(state: Arc<AppState>, req: Request<Incoming>) -> Response<BoxBody> {
    let path = req.uri().path().to_string();
    tracing::debug!("{} {}", req.method(), path);

    let Some(route) = path.strip_prefix(state.base_url.as_str()) else {
        return not_found();
    };
    let route = route.trim_end_matches('/');

    if route != DATASETS_ROUTE && route != POST_SAVE_ROUTE {
        return not_found();
    }

    if !is_authorized(&state, &req) {
        tracing::warn!("Rejected unauthenticated request to {}", path);
        return text_response(StatusCode::FORBIDDEN, "Forbidden");
    }

    match (route, req.method()) {
        (DATASETS_ROUTE, &Method::GET) => text_response(StatusCode::OK, "pong"),
        (DATASETS_ROUTE, &Method::POST) => handle_upload(state, req).await,
        (DATASETS_ROUTE, _) => method_not_allowed("GET, POST"),
        (POST_SAVE_ROUTE, &Method::POST) => handle_post_save(state, req).await,
        _ => method_not_allowed("POST"),
    }
}

/// Check the shared token, if one is configured.
///
/// Accepts `Authorization: token <t>` (or `Bearer <t>`) and `?token=<t>`.
fn is_authorized(state: &AppState, req: &Request<Incoming>) -> bool {
    let Some(expected) = state.token.as_deref() else {
        return true;
    };

    let from_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("token ")
                .or_else(|| v.strip_prefix("Bearer "))
        })
        .map(str::trim);

    if from_header == Some(expected) {
        return true;
    }

    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .any(|(key, value)| key == "token" && value == expected)
        })
        .unwrap_or(false)
}

/// POST {base}api/datasets - forward an uploaded file to the datasets service.
async fn handle_upload(state: Arc<AppState>, req: Request<Incoming>) -> Response<BoxBody> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let boundary = match multer::parse_boundary(content_type) {
        Ok(b) => b,
        Err(_) => {
            return text_response(
                StatusCode::BAD_REQUEST,
                "Expected multipart/form-data with boundary",
            );
        }
    };

    if let Some(content_length) = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        if content_length > state.max_upload_bytes {
            return text_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                &format!(
                    "Upload exceeds configured limit ({} > {} bytes)",
                    content_length, state.max_upload_bytes
                ),
            );
        }
    }

    let upload = match read_file_part(req, boundary, state.max_upload_bytes).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return text_response(StatusCode::BAD_REQUEST, "No file in request"),
        Err(UploadError::InvalidMultipart(e)) => {
            return text_response(StatusCode::BAD_REQUEST, &e);
        }
        Err(UploadError::PayloadTooLarge(e)) => {
            return text_response(StatusCode::PAYLOAD_TOO_LARGE, &e);
        }
    };

    let original = upload
        .filename
        .as_deref()
        .and_then(|name| sanitize_upload_name(name).ok())
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());

    let filename = match &state.upload_dir {
        Some(dir) => {
            let dir = dir.clone();
            let bytes = upload.bytes.clone();
            let name = original.clone();
            let saved = tokio::task::spawn_blocking(move || save_upload(&dir, &name, &bytes)).await;
            match saved {
                Ok(Ok(path)) => {
                    tracing::info!("Stored upload {} as {}", original, path.display());
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| normalize_filename(&original))
                }
                Ok(Err(e)) => {
                    tracing::error!("Failed to store upload {}: {}", original, e);
                    return text_response(StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED);
                }
                Err(e) => {
                    tracing::error!("Upload storage task failed: {}", e);
                    return text_response(StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED);
                }
            }
        }
        None => normalize_filename(&original),
    };

    tracing::info!(
        "Creating dataset from {} ({} bytes)",
        filename,
        upload.bytes.len()
    );

    match state
        .datasets
        .create_dataset(upload.bytes.to_vec(), &filename)
        .await
    {
        Ok(dataset) => json_response(StatusCode::OK, &dataset),
        Err(e) => {
            tracing::error!("Unable to create dataset from {}: {}", filename, e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED)
        }
    }
}

/// Pull the first `file` part out of a multipart body. Other parts are drained.
async fn read_file_part(
    req: Request<Incoming>,
    boundary: String,
    max_upload_bytes: u64,
) -> Result<Option<UploadedFile>, UploadError> {
    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().whole_stream(max_upload_bytes));
    let body_stream = req.into_body().into_data_stream();
    let mut multipart = multer::Multipart::with_constraints(body_stream, boundary, constraints);

    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await? {
        if upload.is_none() && field.name() == Some("file") {
            let filename = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;
            upload = Some(UploadedFile { filename, bytes });
            continue;
        }

        while field.chunk().await?.is_some() {}
    }

    Ok(upload)
}

/// POST {base}api/post-save - run the save hook for one file.
async fn handle_post_save(state: Arc<AppState>, req: Request<Incoming>) -> Response<BoxBody> {
    let body = match Limited::new(req.into_body(), MAX_EVENT_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_body", &e.to_string());
        }
    };

    let event: SaveEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_json", &e.to_string());
        }
    };

    match post_save(
        &event.model_type,
        &event.path,
        state.projects.as_ref(),
        state.projects_resource,
    )
    .await
    {
        Ok(outcome) => json_response(StatusCode::OK, &outcome),
        Err(e) => {
            tracing::error!("Post-save hook failed for {}: {}", event.path.display(), e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "hook_failed", &e.to_string())
        }
    }
}
