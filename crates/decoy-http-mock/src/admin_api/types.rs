//! Response helpers and shared state for the Admin API.

use crate::engine::Dispatcher;
use crate::expectation::{Expectation, ExpectationRegistry};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

/// What the admin handlers operate on
#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<ExpectationRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

/// Individual error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Expectation together with its registry index
#[derive(Debug, Serialize)]
pub struct IndexedExpectation {
    pub index: usize,
    #[serde(flatten)]
    pub expectation: Expectation,
}

/// Response for listing expectations
#[derive(Debug, Serialize)]
pub struct ListExpectationsResponse {
    pub expectations: Vec<IndexedExpectation>,
}

impl ListExpectationsResponse {
    pub fn from_list(expectations: Vec<Expectation>) -> Self {
        Self {
            expectations: expectations
                .into_iter()
                .enumerate()
                .map(|(index, expectation)| IndexedExpectation { index, expectation })
                .collect(),
        }
    }
}

/// Extract base URL from request headers for links
pub fn get_base_url(req: &Request<Incoming>) -> String {
    req.headers()
        .get("host")
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_else(|| "http://localhost:2525".to_string())
}

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    build_response_with_headers(status, [("Content-Type", "application/json")], json)
}

/// Build an HTTP response with headers; falls back to a bare 500 body if the
/// builder rejects them.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// Create an error response
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let error = ErrorResponse {
        errors: vec![ErrorDetail {
            code: status.as_str().to_string(),
            message: message.to_string(),
        }],
    };
    json_response(status, &error)
}

/// Create a not found response
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Collect request body into bytes
pub async fn collect_body(req: Request<Incoming>) -> Result<Bytes, String> {
    use http_body_util::BodyExt;
    req.collect()
        .await
        .map(|c| c.to_bytes())
        .map_err(|e| format!("Failed to read request body: {e}"))
}
