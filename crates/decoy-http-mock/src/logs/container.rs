//! Append-only request log shared by every request.

use super::types::{EntryField, LogEntry, LogError};
use crate::engine::Request;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct LogState {
    entries: BTreeMap<u64, LogEntry>,
    next_id: u64,
    /// Bumped by every clear; ids are only unique within one epoch
    epoch: u64,
}

impl LogState {
    fn insert(&mut self, request: Request) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, LogEntry::new(id, request));
        id
    }
}

/// Sequentially numbered log of served requests.
///
/// Ids start at 0 and only grow until [`LogContainer::clear`] resets them.
#[derive(Default)]
pub struct LogContainer {
    state: Mutex<LogState>,
}

impl LogContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `request` as a new entry and return its id
    pub fn add(&self, request: Request) -> u64 {
        self.state.lock().insert(request)
    }

    /// Store `request` and get a handle bound to the new entry
    pub fn open(self: &Arc<Self>, request: Request) -> EntryHandle {
        let mut state = self.state.lock();
        let id = state.insert(request);
        EntryHandle {
            log: Arc::clone(self),
            id,
            epoch: state.epoch,
        }
    }

    /// Attach `field` to the most recently added entry
    pub fn update_last_with(&self, field: EntryField) -> Result<(), LogError> {
        let mut state = self.state.lock();
        let entry = state
            .entries
            .values_mut()
            .next_back()
            .ok_or(LogError::Empty)?;
        entry.apply(field);
        Ok(())
    }

    /// Attach `field` to the entry with `id`
    pub fn update(&self, id: u64, field: EntryField) -> Result<(), LogError> {
        let mut state = self.state.lock();
        let entry = state.entries.get_mut(&id).ok_or(LogError::NotFound(id))?;
        entry.apply(field);
        Ok(())
    }

    /// Attach `field` to entry `id` only if the log was not cleared since
    /// `epoch`.
    fn update_in_epoch(&self, epoch: u64, id: u64, field: EntryField) -> Result<(), LogError> {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return Err(LogError::Stale(id));
        }
        let entry = state.entries.get_mut(&id).ok_or(LogError::NotFound(id))?;
        entry.apply(field);
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<LogEntry> {
        self.state.lock().entries.get(&id).cloned()
    }

    /// Id of the most recently added entry
    pub fn latest_id(&self) -> Option<u64> {
        self.state.lock().entries.keys().next_back().copied()
    }

    /// All entries ordered by id
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Drop every entry and restart numbering at 0.
    ///
    /// Handles opened before the clear stop writing, even once their id is
    /// handed out again.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let count = state.entries.len();
        let epoch = state.epoch + 1;
        *state = LogState {
            epoch,
            ..LogState::default()
        };
        info!("Cleared {} log entries", count);
    }

    /// Whole container as a JSON document
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries()).unwrap_or_default()
    }
}

impl fmt::Display for LogContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self.entries()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Entry created for one in-flight request.
///
/// Updates go to this entry by id, so concurrent requests never write into
/// each other's entries. After a clear the handle no longer writes at all.
#[derive(Clone)]
pub struct EntryHandle {
    log: Arc<LogContainer>,
    id: u64,
    epoch: u64,
}

impl EntryHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Attach `field` to this entry. A cleared log only produces a warning.
    pub fn record(&self, field: EntryField) {
        let key = field.key();
        match self.log.update_in_epoch(self.epoch, self.id, field) {
            Ok(()) => debug!("Log {}: attached {}", self.id, key),
            Err(e) => warn!("Could not attach {} to log entry: {}", key, e),
        }
    }
}
