//! Expectation definitions.
//!
//! An expectation pairs a request clause with an action: either a canned
//! `response` or a `forward` to a real host. Optional `delay` and `priority`
//! fields tune when and which expectation is applied.

use crate::engine::Headers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registered rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Request clause; an expectation without one matches every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<ForwardSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
    /// Seconds to wait before producing the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Higher wins; absent sorts after every present value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl Expectation {
    /// Expectation answering every request with `response`
    pub fn responding(response: ResponseSpec) -> Self {
        Self {
            response: Some(response),
            ..Default::default()
        }
    }

    /// Expectation forwarding every request to `forward`
    pub fn forwarding(forward: ForwardSpec) -> Self {
        Self {
            forward: Some(forward),
            ..Default::default()
        }
    }

    pub fn with_request(mut self, request: RequestClause) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_delay(mut self, seconds: u64) -> Self {
        self.delay = Some(seconds);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Request clause of an expectation. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Header name to value pattern
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Cookie name to value pattern
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cookies: BTreeMap<String, String>,
}

impl RequestClause {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }
}

/// Forward action: relay the request to `scheme://host/<path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardSpec {
    pub scheme: String,
    pub host: String,
    /// Headers set on the outbound request, replacing inbound values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

impl ForwardSpec {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            headers: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Canned response action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub httpcode: Option<u16>,
    /// String bodies are sent as-is, any other JSON value is serialized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

impl ResponseSpec {
    pub fn new(httpcode: u16, body: impl Into<String>) -> Self {
        Self {
            httpcode: Some(httpcode),
            body: Some(serde_json::Value::String(body.into())),
            headers: None,
        }
    }

    /// Body rendered as text
    pub fn body_text(&self) -> String {
        match &self.body {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectation_from_json() {
        let json = r#"{
            "request": {"path": "pathv", "headers": {"Accept": "json"}},
            "response": {"httpcode": 201, "body": "Mock answer!", "headers": {"h1": "hv1"}},
            "delay": 2,
            "priority": 5
        }"#;
        let exp: Expectation = serde_json::from_str(json).unwrap();

        let request = exp.request.as_ref().unwrap();
        assert_eq!(request.path.as_deref(), Some("pathv"));
        assert_eq!(request.headers.get("Accept").map(String::as_str), Some("json"));

        let response = exp.response.as_ref().unwrap();
        assert_eq!(response.httpcode, Some(201));
        assert_eq!(response.body_text(), "Mock answer!");
        assert_eq!(exp.delay, Some(2));
        assert_eq!(exp.priority, Some(5));
        assert!(exp.forward.is_none());
    }

    #[test]
    fn test_forward_from_json() {
        let json = r#"{"forward": {"scheme": "https", "host": "real_hostname.com", "headers": {"X-A": "1"}}}"#;
        let exp: Expectation = serde_json::from_str(json).unwrap();
        let forward = exp.forward.unwrap();
        assert_eq!(forward.scheme, "https");
        assert_eq!(forward.host, "real_hostname.com");
        assert_eq!(forward.headers.unwrap().get("X-A").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let exp: Expectation = serde_json::from_str(r#"{"not_priority": 0}"#).unwrap();
        assert_eq!(exp, Expectation::default());
    }

    #[test]
    fn test_body_text_serializes_json_bodies() {
        let spec: ResponseSpec = serde_json::from_str(r#"{"body": {"message": "hi"}}"#).unwrap();
        assert_eq!(spec.body_text(), r#"{"message":"hi"}"#);

        assert_eq!(ResponseSpec::default().body_text(), "");
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let exp = Expectation::responding(ResponseSpec::new(200, "ok"));
        let json = serde_json::to_value(&exp).unwrap();
        assert!(json.get("forward").is_none());
        assert!(json.get("delay").is_none());
        assert_eq!(json["response"]["httpcode"], 200);
    }
}
