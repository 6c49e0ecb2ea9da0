//! Request utilities for HTTP endpoints.

use std::fmt::Display;
use std::sync::Arc;

use book_store_core::error::StoreError;
use book_store_core::BookRepository;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time;

use crate::router::{AppState, RouterError};

/// Reads the request body, failing with `Timeout` after `timeout_ms`.
pub async fn read_request_body_with_timeout<B>(
    req: Request<B>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.into_body().collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Reads and deserializes a JSON request body.
pub async fn read_json_body<T, B>(req: Request<B>, timeout_ms: u64) -> Result<T, RouterError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Display,
{
    let body_bytes = read_request_body_with_timeout(req, timeout_ms).await?;
    serde_json::from_slice(&body_bytes)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Runs a repository call on the blocking pool.
///
/// Snapshot writes hit the filesystem, so repository calls stay off the
/// async worker threads.
pub async fn with_repository<F, T>(state: &AppState, f: F) -> Result<T, RouterError>
where
    F: FnOnce(&dyn BookRepository) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let repository = Arc::clone(&state.repository);
    tokio::task::spawn_blocking(move || f(repository.as_ref()))
        .await
        .map_err(|e| RouterError::InternalError(format!("Repository task failed: {}", e)))?
        .map_err(map_store_error_to_router_error)
}

/// Map StoreError to appropriate RouterError
pub fn map_store_error_to_router_error(e: StoreError) -> RouterError {
    match e {
        StoreError::BookNotFound { .. } => RouterError::NotFound(e.to_string()),
        _ => RouterError::InternalError(format!("Store error: {}", e)),
    }
}

/// Percent-decodes a path parameter.
pub fn decode_path_param(raw: &str) -> Result<String, RouterError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| RouterError::BadRequest(format!("Invalid path parameter '{}': {}", raw, e)))
}

/// Serializes `data` into a JSON response with the given status.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(data)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
