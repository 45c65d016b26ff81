//! Expectations: what the server answers and how.
//!
//! - `types`: expectation, request clause, forward and response specs
//! - `registry`: in-memory store and the `ExpectationSource` seam
//! - `matcher`: request clause matching and the `ExpectationMatcher` seam
//! - `priority`: ordering of matched candidates

mod matcher;
mod priority;
mod registry;
mod types;

pub use matcher::{ExpectationMatcher, RequestMatcher};
pub use priority::{order_by_priority, select_expectation};
pub use registry::{ExpectationRegistry, ExpectationSource, RegistryError};
pub use types::{Expectation, ForwardSpec, RequestClause, ResponseSpec};
