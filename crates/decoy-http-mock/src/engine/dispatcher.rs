//! Per-request pipeline: log, gate, match, select, execute, record.

use super::executor::ActionExecutor;
use super::types::{NormalizedResponse, Request};
use super::whitelist::{request_host, HostWhitelist};
use crate::expectation::{select_expectation, ExpectationMatcher, ExpectationSource};
use crate::logs::{EntryField, LogContainer};
use crate::proxy::{ForwardingClient, Transport};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Prefix of the diagnostic body returned when nothing matches
pub const NO_EXPECTATION_PREFIX: &str = "No expectation for request: ";

/// Status returned to hosts outside the whitelist
const NOT_ALLOWED: u16 = 405;

/// The dispatch engine.
///
/// Built once at startup; owns the request log and the host whitelist and
/// reads expectations from the injected source on every request.
pub struct Dispatcher {
    log: Arc<LogContainer>,
    source: Arc<dyn ExpectationSource>,
    matcher: Arc<dyn ExpectationMatcher>,
    executor: ActionExecutor,
    whitelist: HostWhitelist,
    logs_url: Option<String>,
}

impl Dispatcher {
    pub fn new(
        source: Arc<dyn ExpectationSource>,
        matcher: Arc<dyn ExpectationMatcher>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            log: Arc::new(LogContainer::new()),
            source,
            matcher,
            executor: ActionExecutor::new(ForwardingClient::new(transport)),
            whitelist: HostWhitelist::default(),
            logs_url: None,
        }
    }

    pub fn with_host_whitelist(mut self, whitelist: HostWhitelist) -> Self {
        self.whitelist = whitelist;
        self
    }

    /// Base URL where log entries can be looked up, used in request traces
    pub fn with_logs_url(mut self, logs_url: Option<String>) -> Self {
        self.logs_url = logs_url;
        self
    }

    pub fn log_container(&self) -> &Arc<LogContainer> {
        &self.log
    }

    pub fn host_whitelist(&self) -> &HostWhitelist {
        &self.whitelist
    }

    pub fn logs_url(&self) -> Option<&str> {
        self.logs_url.as_deref()
    }

    /// Produce the response for `request`.
    ///
    /// Never fails: rejections, missing expectations and upstream errors all
    /// come back as responses, and the response is attached to the request's
    /// log entry before returning.
    pub async fn generate_response(&self, request: &Request) -> NormalizedResponse {
        let entry = self.log.open(request.clone());
        match &self.logs_url {
            Some(url) => info!(
                "Log {}/{} for request {} {} headers: {:?}",
                url,
                entry.id(),
                request.method,
                request.path,
                request.headers
            ),
            None => info!(
                "Log id {} for request {} {} headers: {:?}",
                entry.id(),
                request.method,
                request.path,
                request.headers
            ),
        }

        if !self.whitelist.allows(&request.headers, self.matcher.as_ref()) {
            warn!(
                "Request's host '{}' not in a white list!",
                request_host(&request.headers)
            );
            let response = NormalizedResponse::status(NOT_ALLOWED);
            entry.record(EntryField::Response(response.to_dict()));
            return response;
        }

        let all = self.source.all_expectations();
        let candidates = self.matcher.match_expectations(request, &all);

        let response = match select_expectation(candidates) {
            Some(expectation) => {
                debug!("Matched expectation: {:?}", expectation);
                self.executor.execute(&expectation, request, &entry).await
            }
            None => {
                warn!("List of expectations is empty!");
                NormalizedResponse::ok(format!("{}{}", NO_EXPECTATION_PREFIX, request))
            }
        };

        entry.record(EntryField::Response(response.to_dict()));
        debug!("Response: {}", response);
        response
    }

    /// Text form of one log entry, or of the whole log.
    ///
    /// An empty, malformed or unknown `log_id` yields the whole log; a
    /// malformed one is also reported at error level.
    pub fn log_messages(&self, log_id: &str) -> String {
        if !log_id.is_empty() {
            match log_id.parse::<u64>() {
                Ok(id) => {
                    if let Some(entry) = self.log.get(id) {
                        return serde_json::to_string_pretty(&entry)
                            .unwrap_or_else(|_| self.log.to_string());
                    }
                }
                Err(_) => error!("Id for log message is not integer!"),
            }
        }
        self.log.to_string()
    }

    pub fn clear_log_messages(&self) {
        self.log.clear();
    }
}
