//! Request handlers for the library REST API.

mod book;
mod content;
mod genre;

pub use book::*;
pub use content::*;
pub use genre::*;

use axum::body::Body;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use serde::Serialize;

use crate::context::{RequestContext, REQUEST_ID_HEADER};
use crate::error::{ErrorCode, LibraryError, LibraryResult};

/// Server header value sent with every response.
const SERVER_NAME: &str = concat!("diglib-rs/", env!("CARGO_PKG_VERSION"));

/// Creates common response headers for library API responses.
pub fn common_headers(ctx: &RequestContext) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
    headers
}

/// Builds a response with the given status, headers, and body.
pub fn build_response(
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
) -> LibraryResult<Response<Body>> {
    let mut response = Response::builder().status(status).body(body).map_err(|e| {
        LibraryError::with_message(ErrorCode::InternalError, format!("Failed to build response: {}", e))
    })?;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Serializes `value` as a JSON response.
pub fn json_response<T: Serialize>(
    ctx: &RequestContext,
    status: StatusCode,
    value: &T,
) -> LibraryResult<Response<Body>> {
    let body = serde_json::to_vec(value).map_err(|e| {
        LibraryError::with_message(ErrorCode::InternalError, format!("Failed to encode response: {}", e))
    })?;
    let mut headers = common_headers(ctx);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    build_response(status, headers, Body::from(body))
}

/// Returns `text` as a plain-text response.
pub fn text_response(
    ctx: &RequestContext,
    status: StatusCode,
    text: impl Into<String>,
) -> LibraryResult<Response<Body>> {
    let mut headers = common_headers(ctx);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    build_response(status, headers, Body::from(text.into()))
}

/// Parses the `{id}` path segment of a book route.
pub fn parse_book_id(raw: &str) -> LibraryResult<u64> {
    raw.parse().map_err(|_| {
        LibraryError::with_message(ErrorCode::InvalidInput, format!("Invalid book ID: {}", raw))
    })
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// GET /health - Liveness probe.
pub async fn health(ctx: &RequestContext) -> LibraryResult<Response<Body>> {
    json_response(ctx, StatusCode::OK, &HealthStatus { status: "ok" })
}
