//! Matching of inbound requests against expectation request clauses.
//!
//! Values are compared with [`ExpectationMatcher::value_matches`]: exact
//! equality first, then the pattern is treated as a regular expression searched anywhere in the value.

use super::types::{Expectation, RequestClause};
use crate::engine::Request;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Decides which expectations apply to a request.
pub trait ExpectationMatcher: Send + Sync {
    /// Subset of `expectations` whose request clause matches `request`.
    fn match_expectations(&self, request: &Request, expectations: &[Expectation])
        -> Vec<Expectation>;

    /// Whether a single value satisfies a pattern.
    fn value_matches(&self, pattern: &str, value: &str) -> bool;
}

/// Default matcher with a cache of compiled patterns.
#[derive(Default)]
pub struct RequestMatcher {
    /// `None` records a pattern that is not a valid regex
    compiled: RwLock<HashMap<String, Option<Arc<Regex>>>>,
}

impl RequestMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn regex_for(&self, pattern: &str) -> Option<Arc<Regex>> {
        if let Some(cached) = self.compiled.read().get(pattern) {
            return cached.clone();
        }

        let compiled = match Regex::new(pattern) {
            Ok(re) => Some(Arc::new(re)),
            Err(e) => {
                debug!("Pattern '{}' is not a valid regex: {}", pattern, e);
                None
            }
        };
        self.compiled
            .write()
            .insert(pattern.to_string(), compiled.clone());
        compiled
    }

    /// Whether every present field of `clause` matches `request`.
    pub fn clause_matches(&self, clause: &RequestClause, request: &Request) -> bool {
        let body = request.body_lossy();
        let scalar_fields = [
            (&clause.method, request.method.as_str()),
            (&clause.path, request.path.as_str()),
            (&clause.body, body.as_ref()),
        ];
        for (pattern, value) in scalar_fields {
            if let Some(pattern) = pattern {
                if !self.value_matches(pattern, value) {
                    return false;
                }
            }
        }

        let headers_match = clause.headers.iter().all(|(name, pattern)| {
            request
                .headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .is_some_and(|(_, value)| self.value_matches(pattern, value))
        });
        if !headers_match {
            return false;
        }

        clause.cookies.iter().all(|(name, pattern)| {
            request
                .cookies
                .get(name)
                .is_some_and(|value| self.value_matches(pattern, value))
        })
    }
}

impl ExpectationMatcher for RequestMatcher {
    fn match_expectations(
        &self,
        request: &Request,
        expectations: &[Expectation],
    ) -> Vec<Expectation> {
        expectations
            .iter()
            .filter(|exp| match exp.request {
                Some(ref clause) => self.clause_matches(clause, request),
                None => true,
            })
            .cloned()
            .collect()
    }

    fn value_matches(&self, pattern: &str, value: &str) -> bool {
        if pattern == value {
            return true;
        }
        self.regex_for(pattern)
            .map(|re| re.is_match(value))
            .unwrap_or(false)
    }
}
