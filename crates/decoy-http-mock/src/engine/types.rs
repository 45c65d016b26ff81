//! Value types shared by the dispatch pipeline.
//!
//! `Request` is the normalized form of an inbound HTTP request and
//! `NormalizedResponse` is what every code path of the engine produces.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Header map keyed by header name, in wire order. Names are compared
/// case-sensitively. A repeated header holds its values joined with `", "`.
pub type Headers = IndexMap<String, String>;

// ============================================================================
// Request
// ============================================================================

/// Normalized inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: String,
    /// Request path without the leading slash (query string appended when present)
    #[serde(default)]
    pub path: String,
    /// Raw body bytes; serialized as UTF-8 text with invalid sequences replaced
    #[serde(default, with = "lossy_text")]
    pub body: Bytes,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Look up a header by its exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

mod lossy_text {
    use super::*;

    pub fn serialize<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        String::deserialize(deserializer).map(Bytes::from)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// ============================================================================
// NormalizedResponse
// ============================================================================

/// Response produced by the engine, independent of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    status_code: u16,
    text: Bytes,
    headers: Headers,
}

impl Default for NormalizedResponse {
    fn default() -> Self {
        Self {
            status_code: 200,
            text: Bytes::new(),
            headers: Headers::new(),
        }
    }
}

impl NormalizedResponse {
    pub fn new(status_code: u16, text: impl Into<Bytes>, headers: Headers) -> Self {
        Self {
            status_code,
            text: text.into(),
            headers,
        }
    }

    /// 200 response with the given text and no headers
    pub fn ok(text: impl Into<Bytes>) -> Self {
        Self::new(200, text, Headers::new())
    }

    /// Empty-bodied response with the given status
    pub fn status(status_code: u16) -> Self {
        Self::new(status_code, Bytes::new(), Headers::new())
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn text(&self) -> &Bytes {
        &self.text
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Dict form stored in the request log.
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "status_code": self.status_code,
            "text": self.text_lossy(),
            "headers": self.headers,
        })
    }
}

impl fmt::Display for NormalizedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status_code: {}, text: {}, headers: {:?}",
            self.status_code,
            self.text_lossy(),
            self.headers
        )
    }
}
