//! Namespaced key-value persistence.
//!
//! The store is a restart-recovery mirror only. Reads at runtime go to the
//! in-memory maps; writes here are last-writer-wins overwrites.

mod file;

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde_json::Value;

pub use file::JsonFileStore;

use crate::errors::StoreError;

pub trait Store {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;
}

/// Single-threaded shared handle; both trackers write through the same store.
pub type SharedStore = Rc<RefCell<dyn Store>>;

pub fn shared<S: Store + 'static>(store: S) -> SharedStore {
    Rc::new(RefCell::new(store))
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, for exercising the swallow path.
    pub fn read_only() -> Self {
        Self {
            entries: BTreeMap::new(),
            read_only: true,
        }
    }

    pub fn with_entry(mut self, key: &str, value: Value) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(self.entries.remove(key).is_some())
    }
}
