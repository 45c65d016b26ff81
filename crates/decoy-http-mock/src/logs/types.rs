//! Types stored in the request log.

use crate::engine::{Headers, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One served request and what happened to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub request: Request,
    /// Dict form of the response sent back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<ForwardRecord>,
}

impl LogEntry {
    pub(crate) fn new(id: u64, request: Request) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            request,
            response: None,
            forward: None,
        }
    }

    pub(crate) fn apply(&mut self, field: EntryField) {
        match field {
            EntryField::Response(response) => self.response = Some(response),
            EntryField::Forward(forward) => self.forward = Some(forward),
        }
    }
}

/// Outbound request issued for a forward action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRecord {
    pub request_method: String,
    pub url: String,
    pub body: String,
    pub headers: Headers,
}

/// Data attached to an entry after it was created
#[derive(Debug, Clone, PartialEq)]
pub enum EntryField {
    Response(serde_json::Value),
    Forward(ForwardRecord),
}

impl EntryField {
    pub fn key(&self) -> &'static str {
        match self {
            EntryField::Response(_) => "response",
            EntryField::Forward(_) => "forward",
        }
    }
}

/// Errors from log updates
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Log container is empty, nothing to update")]
    Empty,
    #[error("Log entry {0} not found")]
    NotFound(u64),
    #[error("Log entry {0} was cleared before it could be updated")]
    Stale(u64),
}
