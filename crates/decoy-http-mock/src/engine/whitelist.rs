//! Host whitelist gating.

use super::types::Headers;
use crate::expectation::ExpectationMatcher;

/// Header the whitelist is checked against
const HOST_HEADER: &str = "Host";

/// Allow-list of host patterns. An empty list lets every request through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostWhitelist {
    patterns: Vec<String>,
}

impl HostWhitelist {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether a request with `headers` may be served.
    ///
    /// A missing `Host` header is checked as the empty string.
    pub fn allows(&self, headers: &Headers, matcher: &dyn ExpectationMatcher) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let host = request_host(headers);
        self.patterns
            .iter()
            .any(|pattern| matcher.value_matches(pattern, host))
    }
}

/// Value of the exact `Host` header, or `""`
pub fn request_host(headers: &Headers) -> &str {
    headers.get(HOST_HEADER).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::RequestMatcher;

    fn host(value: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Host".to_string(), value.to_string());
        headers
    }

    #[test]
    fn test_empty_whitelist_passes_everything() {
        let matcher = RequestMatcher::new();
        let whitelist = HostWhitelist::default();
        assert!(whitelist.allows(&host("anything.example"), &matcher));
        assert!(whitelist.allows(&Headers::new(), &matcher));
    }

    #[test]
    fn test_subdomain_matches_pattern() {
        let matcher = RequestMatcher::new();
        let whitelist = HostWhitelist::new(vec!["travix.com".to_string()]);
        assert!(whitelist.allows(&host("blabla.travix.com"), &matcher));
        assert!(whitelist.allows(&host("travix.com"), &matcher));
        assert!(!whitelist.allows(&host("example.org"), &matcher));
    }

    #[test]
    fn test_any_pattern_is_enough() {
        let matcher = RequestMatcher::new();
        let whitelist = HostWhitelist::new(vec!["first.example".to_string(), "^api\\.".to_string()]);
        assert!(whitelist.allows(&host("api.other.example"), &matcher));
    }

    #[test]
    fn test_missing_host_is_checked_as_empty() {
        let matcher = RequestMatcher::new();
        let whitelist = HostWhitelist::new(vec!["travix.com".to_string()]);
        assert!(!whitelist.allows(&Headers::new(), &matcher));

        // a pattern matching the empty string lets host-less requests through
        let permissive = HostWhitelist::new(vec![".*".to_string()]);
        assert!(permissive.allows(&Headers::new(), &matcher));
    }

    #[test]
    fn test_host_lookup_is_case_sensitive() {
        let mut headers = Headers::new();
        headers.insert("host".to_string(), "travix.com".to_string());
        assert_eq!(request_host(&headers), "");
    }
}
