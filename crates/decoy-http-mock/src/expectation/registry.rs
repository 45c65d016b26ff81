//! In-memory expectation registry.

use super::types::Expectation;
use parking_lot::RwLock;
use tracing::{debug, info};

/// Errors raised at the registry boundary
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid expectation: {0}")]
    Invalid(String),
    #[error("Expectation index {0} out of bounds")]
    IndexOutOfBounds(usize),
}

/// Supplies the full expectation collection to the dispatch engine.
pub trait ExpectationSource: Send + Sync {
    fn all_expectations(&self) -> Vec<Expectation>;
}

/// Registered expectations, in insertion order
#[derive(Default)]
pub struct ExpectationRegistry {
    expectations: RwLock<Vec<Expectation>>,
}

impl ExpectationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `expectations`
    pub fn with_expectations(expectations: Vec<Expectation>) -> Self {
        Self {
            expectations: RwLock::new(expectations),
        }
    }

    /// Append an expectation and return its index
    pub fn add(&self, expectation: Expectation) -> usize {
        let mut expectations = self.expectations.write();
        expectations.push(expectation);
        let index = expectations.len() - 1;
        debug!("Registered expectation at index {}", index);
        index
    }

    /// Validate a JSON document as an expectation and register it
    pub fn add_json(&self, value: serde_json::Value) -> Result<usize, RegistryError> {
        let expectation: Expectation =
            serde_json::from_value(value).map_err(|e| RegistryError::Invalid(e.to_string()))?;
        Ok(self.add(expectation))
    }

    pub fn list(&self) -> Vec<Expectation> {
        self.expectations.read().clone()
    }

    pub fn get(&self, index: usize) -> Option<Expectation> {
        self.expectations.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.expectations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.read().is_empty()
    }

    /// Remove the expectation at `index`
    pub fn remove(&self, index: usize) -> Result<Expectation, RegistryError> {
        let mut expectations = self.expectations.write();
        if index >= expectations.len() {
            return Err(RegistryError::IndexOutOfBounds(index));
        }
        Ok(expectations.remove(index))
    }

    /// Remove every expectation equal to `expectation`, returning how many went away
    pub fn remove_matching(&self, expectation: &Expectation) -> usize {
        let mut expectations = self.expectations.write();
        let before = expectations.len();
        expectations.retain(|existing| existing != expectation);
        before - expectations.len()
    }

    pub fn remove_all(&self) {
        let mut expectations = self.expectations.write();
        let count = expectations.len();
        expectations.clear();
        info!("Removed all {} expectations", count);
    }
}

impl ExpectationSource for ExpectationRegistry {
    fn all_expectations(&self) -> Vec<Expectation> {
        self.list()
    }
}
