//! Conversion between hyper messages and engine types.

use crate::engine::{Dispatcher, NormalizedResponse, Request};
use crate::proxy::headers_from_wire;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue, COOKIE};
use hyper::{Response, StatusCode};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serve one request to the mock port
pub async fn handle_mock_request(
    req: hyper::Request<Incoming>,
    dispatcher: Arc<Dispatcher>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let request = to_request(req).await;
    let response = dispatcher.generate_response(&request).await;
    Ok(into_hyper_response(response))
}

/// Normalize a hyper request.
///
/// The path loses its leading `/` and keeps the query string. Header names
/// are Title-Cased and repeated headers are joined. The body is kept as raw
/// bytes; an unreadable body is treated as empty.
pub async fn to_request(req: hyper::Request<Incoming>) -> Request {
    let (parts, body) = req.into_parts();

    let path = request_path(&parts.uri);

    let headers = headers_from_wire(&parts.headers);

    let cookies = parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(parse_cookies)
        .collect();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!("Failed to read request body: {}", e);
            Bytes::new()
        }
    };

    Request {
        method: parts.method.to_string(),
        path,
        body,
        headers,
        cookies,
    }
}

/// `a/b?x=1` for `/a/b?x=1`
pub fn request_path(uri: &hyper::Uri) -> String {
    let path = uri.path().trim_start_matches('/');
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Parse a `Cookie` header value into name/value pairs
pub fn parse_cookies(header: &str) -> BTreeMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

/// Wire form of an engine response. Headers hyper rejects are skipped.
pub fn into_hyper_response(response: NormalizedResponse) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(response.status_code()).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, answering 500",
            response.status_code()
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut out = Response::new(Full::new(response.text().clone()));
    *out.status_mut() = status;

    let headers = out.headers_mut();
    for (name, value) in response.headers() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!("Skipping invalid response header '{}'", name),
        }
    }
    out
}
