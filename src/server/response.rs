//! Response builders.

use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, Infallible>;

fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<BoxBody> {
    let mut response = Response::new(Full::new(body).boxed());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

pub fn text_response(status: StatusCode, message: &str) -> Response<BoxBody> {
    with_body(
        status,
        "text/plain; charset=utf-8",
        Bytes::from(message.to_string()),
    )
}

pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<BoxBody> {
    match serde_json::to_vec(data) {
        Ok(body) => with_body(status, "application/json", Bytes::from(body)),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub fn json_error(status: StatusCode, code: &str, message: &str) -> Response<BoxBody> {
    let body = serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    });
    json_response(status, &body)
}

pub fn method_not_allowed(allowed: &'static str) -> Response<BoxBody> {
    let mut response = text_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(allowed));
    response
}

pub fn not_found() -> Response<BoxBody> {
    text_response(StatusCode::NOT_FOUND, "Not found")
}
