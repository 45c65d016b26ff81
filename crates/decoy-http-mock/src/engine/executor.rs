//! Execution of a selected expectation's action.

use super::types::{NormalizedResponse, Request};
use crate::expectation::{Expectation, ResponseSpec};
use crate::logs::EntryHandle;
use crate::proxy::ForwardingClient;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, warn};

/// Status codes that can go on the wire
const SENDABLE_STATUS: RangeInclusive<u16> = 100..=999;

/// Runs the delay, canned response or forward of an expectation.
#[derive(Clone)]
pub struct ActionExecutor {
    forwarder: ForwardingClient,
}

impl ActionExecutor {
    pub fn new(forwarder: ForwardingClient) -> Self {
        Self { forwarder }
    }

    /// Apply `expectation` to `request`.
    ///
    /// The delay runs first. A canned response takes precedence over a
    /// forward; an expectation with neither yields the default response.
    pub async fn execute(
        &self,
        expectation: &Expectation,
        request: &Request,
        entry: &EntryHandle,
    ) -> NormalizedResponse {
        if let Some(seconds) = expectation.delay {
            debug!("Delaying response by {} seconds", seconds);
            tokio::time::sleep(Duration::from_secs(seconds)).await;
        }

        if let Some(response) = &expectation.response {
            return canned_response(response);
        }

        if let Some(forward) = &expectation.forward {
            return self.forwarder.forward(forward, request, entry).await;
        }

        NormalizedResponse::default()
    }
}

/// Response described by a `response` clause.
///
/// A code that cannot be sent becomes 500 here, so the log records the status
/// the caller actually receives.
pub fn canned_response(spec: &ResponseSpec) -> NormalizedResponse {
    let status = match spec.httpcode {
        None => 200,
        Some(code) if SENDABLE_STATUS.contains(&code) => code,
        Some(code) => {
            warn!("Invalid status code {} in canned response, answering 500", code);
            500
        }
    };
    NormalizedResponse::new(
        status,
        spec.body_text(),
        spec.headers.clone().unwrap_or_default(),
    )
}
