//! Per-scope language memory.
//!
//! A [`ScopeTracker`] owns one [`ScopeLanguageMap`] and mirrors it into the
//! shared [`Store`](crate::store::Store). The coordinator holds the tab
//! instance, every contact-aware page holds a contact instance.

pub mod contact;
pub mod throttle;

use std::collections::{HashMap, hash_map};

use autolang_core::LanguageLabel;
use serde_json::{Map, Value};

pub use contact::{ContactSwitch, ContactTracker};
pub use throttle::Throttle;

use crate::{
    domain::ScopeKey,
    errors::{ErrorClass, StoreError, swallow},
    store::SharedStore,
};

/// At most one label per scope; lookups are exact-match only.
#[derive(Debug, Clone)]
pub struct ScopeLanguageMap<K: ScopeKey> {
    entries: HashMap<K, LanguageLabel>,
}

impl<K: ScopeKey> Default for ScopeLanguageMap<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: ScopeKey> ScopeLanguageMap<K> {
    pub fn get(&self, key: &K) -> Option<LanguageLabel> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: K, label: LanguageLabel) -> Option<LanguageLabel> {
        self.entries.insert(key, label)
    }

    pub fn remove(&mut self, key: &K) -> Option<LanguageLabel> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, LanguageLabel> {
        self.entries.iter()
    }
}

/// How a tracker mirrors itself into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// One key holding the whole map as `{ "<scope>": "<label>" }`.
    Snapshot { key: String },
    /// One key per scope, `<prefix><scope>` -> `"<label>"`.
    PerKey { prefix: String },
}

pub struct ScopeTracker<K: ScopeKey> {
    map: ScopeLanguageMap<K>,
    store: SharedStore,
    persistence: Persistence,
}

impl<K: ScopeKey> ScopeTracker<K> {
    pub fn new(store: SharedStore, persistence: Persistence) -> Self {
        Self {
            map: ScopeLanguageMap::default(),
            store,
            persistence,
        }
    }

    /// Remembered label, `English` when the scope has no record.
    pub fn get_language(&self, scope: &K) -> LanguageLabel {
        self.map.get(scope).unwrap_or_default()
    }

    pub fn recorded(&self, scope: &K) -> Option<LanguageLabel> {
        self.map.get(scope)
    }

    /// Stores `label` when it differs from the current label, counting a
    /// missing record as `English`. Returns whether anything changed.
    pub fn set_language(&mut self, scope: K, label: LanguageLabel) -> bool {
        if self.get_language(&scope) == label {
            return false;
        }
        self.commit(scope, label);
        true
    }

    /// Like [`Self::set_language`], but a missing record differs from every
    /// label, so the first assignment always lands.
    pub fn remember(&mut self, scope: K, label: LanguageLabel) -> bool {
        if self.map.get(&scope) == Some(label) {
            return false;
        }
        self.commit(scope, label);
        true
    }

    /// Explicit override: always stores and persists.
    pub fn force_language(&mut self, scope: K, label: LanguageLabel) {
        self.commit(scope, label);
    }

    fn commit(&mut self, scope: K, label: LanguageLabel) {
        let previous = self.map.insert(scope.clone(), label);
        tracing::debug!(scope = %scope, ?previous, language = %label, "scope language recorded");
        self.persist(&scope, Some(label));
    }

    pub fn remove_scope(&mut self, scope: &K) -> bool {
        let existed = self.map.remove(scope).is_some();
        if existed {
            tracing::debug!(scope = %scope, remaining = self.map.len(), "scope removed");
            self.persist(scope, None);
        }
        existed
    }

    /// Memory first, then the store. A store hit is cached in memory.
    pub fn recall(&mut self, scope: &K) -> Option<LanguageLabel> {
        if let Some(label) = self.map.get(scope) {
            return Some(label);
        }

        let Persistence::PerKey { prefix } = &self.persistence else {
            return None;
        };
        let key = format!("{prefix}{}", scope.to_persisted());
        let value = swallow(ErrorClass::Persistence, "recall", self.store.borrow().get(&key))??;
        let label = parse_label(&value)?;

        self.map.insert(scope.clone(), label);
        tracing::debug!(scope = %scope, language = %label, "scope language recalled from store");
        Some(label)
    }

    /// Bulk-loads persisted entries. Keys are coerced to the runtime key
    /// type; entries whose key does not parse are dropped.
    pub fn restore<I, S>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (S, LanguageLabel)>,
        S: AsRef<str>,
    {
        let mut restored = 0;
        for (raw, label) in entries {
            let raw: &str = raw.as_ref();
            let Some(scope) = K::from_persisted(raw) else {
                tracing::warn!(key = raw, "dropping persisted entry with invalid scope key");
                continue;
            };
            self.map.insert(scope, label);
            restored += 1;
        }
        restored
    }

    /// Restores a snapshot written under [`Persistence::Snapshot`].
    pub fn restore_from_store(&mut self) -> usize {
        let Persistence::Snapshot { key } = &self.persistence else {
            return 0;
        };

        let Some(Some(value)) = swallow(
            ErrorClass::Persistence,
            "restore",
            self.store.borrow().get(key),
        ) else {
            tracing::info!("no saved scope languages found");
            return 0;
        };

        let Value::Object(object) = value else {
            tracing::warn!(key = %key, "saved scope languages are not an object");
            return 0;
        };

        let entries: Vec<(String, LanguageLabel)> = object
            .into_iter()
            .filter_map(|(scope, value)| parse_label(&value).map(|label| (scope, label)))
            .collect();

        let restored = self.restore(entries);
        tracing::info!(restored, "restored scope languages from store");
        restored
    }

    fn persist(&self, scope: &K, label: Option<LanguageLabel>) {
        let result = match &self.persistence {
            Persistence::Snapshot { key } => self.write_snapshot(key),
            Persistence::PerKey { prefix } => {
                let key = format!("{prefix}{}", scope.to_persisted());
                let mut store = self.store.borrow_mut();
                match label {
                    Some(label) => store.set(&key, Value::from(label.as_str())),
                    None => store.remove(&key).map(|_| ()),
                }
            }
        };
        swallow(ErrorClass::Persistence, "persist", result);
    }

    fn write_snapshot(&self, key: &str) -> Result<(), StoreError> {
        let object: Map<String, Value> = self
            .map
            .iter()
            .map(|(scope, label)| (scope.to_persisted(), Value::from(label.as_str())))
            .collect();
        self.store.borrow_mut().set(key, Value::Object(object))
    }

    pub fn entries(&self) -> Vec<(K, LanguageLabel)> {
        self.map
            .iter()
            .map(|(scope, label)| (scope.clone(), *label))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drops the in-memory cache only; the store keeps its entries.
    pub fn clear_memory(&mut self) {
        self.map.clear();
    }
}

fn parse_label(value: &Value) -> Option<LanguageLabel> {
    let raw = value.as_str()?;
    match raw.parse() {
        Ok(label) => Some(label),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring persisted label");
            None
        }
    }
}
