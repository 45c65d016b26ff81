//! Dispatch engine.
//!
//! Turns a normalized request into a normalized response: the request is
//! logged, gated by the host whitelist, matched against the registered
//! expectations, and the highest-priority match is executed.
//!
//! # Module Structure
//!
//! - `types` - `Request`, `NormalizedResponse`, `Headers`
//! - `whitelist` - host whitelist guard
//! - `executor` - delay / canned response / forward actions
//! - `dispatcher` - the per-request pipeline

mod dispatcher;
mod executor;
mod types;
mod whitelist;


pub use dispatcher::{Dispatcher, NO_EXPECTATION_PREFIX};
pub use executor::{canned_response, ActionExecutor};
pub use types::{Headers, NormalizedResponse, Request};
pub use whitelist::{request_host, HostWhitelist};
