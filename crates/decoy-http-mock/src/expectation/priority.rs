//! Priority ordering of matched expectations.

use super::types::Expectation;
use std::cmp::Reverse;

/// Stable sort, highest `priority` first.
///
/// Expectations without a priority go after every prioritized one; ties keep
/// their input order.
pub fn order_by_priority(mut expectations: Vec<Expectation>) -> Vec<Expectation> {
    // Reverse(None) is greater than any Reverse(Some(_)), so absent priorities land last
    expectations.sort_by_key(|exp| Reverse(exp.priority));
    expectations
}

/// Expectation to apply out of the matched candidates
pub fn select_expectation(candidates: Vec<Expectation>) -> Option<Expectation> {
    order_by_priority(candidates).into_iter().next()
}
