//! Outbound transport used by forward actions.
//!
//! The forwarding client talks to upstream hosts only through the
//! [`Transport`] trait; [`ReqwestTransport`] is the production implementation.

use super::headers::headers_from_wire;
use crate::engine::Headers;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, warn};

/// Request handed to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: String,
    pub url: String,
    pub body: Bytes,
    pub headers: Headers,
    pub timeout: Duration,
}

/// Upstream answer as seen by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
    /// Title-Case header names
    pub headers: Headers,
}

/// Transport-level failures. None of these reach the caller as errors; the
/// forwarding client turns them into 404 responses.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),
    #[error("Request to {url} timed out after {} seconds", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("Failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Sends a request to an upstream host.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport.
///
/// Upstream certificates are not verified, so forwards to hosts with
/// self-signed or mismatched certificates still go through.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(0) // Disable connection pooling to avoid stale connections
            .build()
            .map_err(|e| TransportError::Client(error_chain(&e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(request.method.clone()))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &request.headers {
            // reqwest only decodes bodies when it negotiates the encoding itself
            if key.eq_ignore_ascii_case(ACCEPT_ENCODING.as_str()) {
                continue;
            }
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid outbound header '{}'", key),
            }
        }

        debug!("Sending {} {}", method, request.url);
        let response = self
            .client
            .request(method, &request.url)
            .headers(headers)
            .body(request.body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify(e, &request.url, request.timeout))?;

        let status = response.status().as_u16();
        let headers = headers_from_wire(response.headers());

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                    timeout: request.timeout,
                }
            } else {
                TransportError::Body {
                    url: request.url.clone(),
                    reason: error_chain(&e),
                }
            }
        })?;

        Ok(TransportResponse {
            status,
            body,
            headers,
        })
    }
}

fn classify(e: reqwest::Error, url: &str, timeout: Duration) -> TransportError {
    let url = url.to_string();
    if e.is_timeout() {
        TransportError::Timeout { url, timeout }
    } else if e.is_connect() {
        TransportError::Connect {
            url,
            reason: error_chain(&e),
        }
    } else {
        TransportError::Request {
            url,
            reason: error_chain(&e),
        }
    }
}

/// Error message including every source, `outer: inner: root`.
fn error_chain(e: &(dyn StdError + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_messages() {
        let err = TransportError::Timeout {
            url: "https://slow.example/x".to_string(),
            timeout: Duration::from_secs(60),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://slow.example/x timed out after 60 seconds"
        );

        let err = TransportError::InvalidMethod("BAD METHOD".to_string());
        assert_eq!(err.to_string(), "Invalid HTTP method 'BAD METHOD'");
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "root cause");
        let wrapped = TransportError::Client(error_chain(&io));
        assert!(wrapped.to_string().contains("root cause"));
    }

    #[tokio::test]
    async fn test_invalid_method_is_rejected_before_sending() {
        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .send(OutboundRequest {
                method: "BAD METHOD".to_string(),
                url: "http://127.0.0.1:1/".to_string(),
                body: Bytes::new(),
                headers: Headers::new(),
                timeout: Duration::from_secs(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidMethod(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .send(OutboundRequest {
                method: "GET".to_string(),
                url: "http://127.0.0.1:1/nothing".to_string(),
                body: Bytes::new(),
                headers: Headers::new(),
                timeout: Duration::from_secs(5),
            })
            .await;
        assert!(result.is_err());
    }
}
