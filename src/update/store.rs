//! Persisted dismissal state

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::config::DISMISSED_VERSION_KEY;
use crate::update::error::StoreError;

/// Trait for durable string key-value storage
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Access to the version the user asked not to be prompted about again
///
/// Values are stored and returned verbatim.
#[derive(Clone)]
pub struct DismissalStore {
    store: Arc<dyn KeyValueStore>,
}

impl DismissalStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get_dismissed_version(&self) -> Result<Option<String>, StoreError> {
        self.store.get_string(DISMISSED_VERSION_KEY)
    }

    pub fn set_dismissed_version(&self, version: &str) -> Result<(), StoreError> {
        self.store.set_string(DISMISSED_VERSION_KEY, version)
    }
}
