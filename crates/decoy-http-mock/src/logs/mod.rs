//! Audit log of served requests.
//!
//! Every request gets an entry on arrival; the response (and, for forwards,
//! the outbound request) is attached before the engine returns.
//!
//! # Module Structure
//!
//! - `types` - entry, forward record and update types
//! - `container` - the shared `LogContainer` and per-request `EntryHandle`

mod container;
mod types;

pub use container::{EntryHandle, LogContainer};
pub use types::{EntryField, ForwardRecord, LogEntry, LogError};
