//! Upstream forwarding.
//!
//! # Module Structure
//!
//! - `headers` - transport header filtering and header name casing
//! - `client` - the `Transport` seam and its `reqwest` implementation
//! - `forwarding` - `ForwardingClient`, which builds, logs and sends forwards

mod client;
mod forwarding;
mod headers;

pub use client::{OutboundRequest, ReqwestTransport, Transport, TransportError, TransportResponse};
pub use forwarding::{ForwardingClient, FORWARD_TIMEOUT};
pub use headers::{
    append_header, filter_headers, forward_request_headers, header_to_title_case,
    headers_from_wire, relayed_response_headers, REQUEST_HEADERS_TO_IGNORE,
    RESPONSE_HEADERS_TO_IGNORE,
};
