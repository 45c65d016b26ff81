//! Forwarding of matched requests to real upstream hosts.

use super::client::{OutboundRequest, Transport};
use super::headers::{forward_request_headers, relayed_response_headers};
use crate::engine::{NormalizedResponse, Request};
use crate::expectation::ForwardSpec;
use crate::logs::{EntryField, EntryHandle, ForwardRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Upper bound for one upstream exchange
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(60);

/// Method used when the inbound request carries none
const DEFAULT_METHOD: &str = "GET";

/// Relays requests through an injected [`Transport`].
#[derive(Clone)]
pub struct ForwardingClient {
    transport: Arc<dyn Transport>,
}

impl ForwardingClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Target URL, `scheme://host/path` with the path taken verbatim
    pub fn target_url(spec: &ForwardSpec, request: &Request) -> String {
        format!("{}://{}/{}", spec.scheme, spec.host, request.path)
    }

    /// Description of the outbound request for `request` under `spec`
    pub fn describe(spec: &ForwardSpec, request: &Request) -> ForwardRecord {
        let request_method = if request.method.is_empty() {
            DEFAULT_METHOD.to_string()
        } else {
            request.method.clone()
        };

        ForwardRecord {
            request_method,
            url: Self::target_url(spec, request),
            body: request.body_lossy().into_owned(),
            headers: forward_request_headers(&request.headers, spec.headers.as_ref()),
        }
    }

    /// Forward `request` and map the outcome to a response.
    ///
    /// The outbound description is logged on `entry` before sending. The body
    /// goes upstream byte for byte; only the logged copy is text. Transport
    /// failures come back as 404 responses carrying the error text.
    pub async fn forward(
        &self,
        spec: &ForwardSpec,
        request: &Request,
        entry: &EntryHandle,
    ) -> NormalizedResponse {
        let record = Self::describe(spec, request);
        entry.record(EntryField::Forward(record.clone()));
        debug!(
            "Forward request: {} {} body: {} headers: {:?}",
            record.request_method, record.url, record.body, record.headers
        );

        let outbound = OutboundRequest {
            method: record.request_method,
            url: record.url,
            body: request.body.clone(),
            headers: record.headers,
            timeout: FORWARD_TIMEOUT,
        };

        match self.transport.send(outbound).await {
            Ok(upstream) => NormalizedResponse::new(
                upstream.status,
                upstream.body,
                relayed_response_headers(&upstream.headers),
            ),
            Err(e) => {
                error!("Forward request failed: {}", e);
                NormalizedResponse::new(404, e.to_string(), Default::default())
            }
        }
    }
}
