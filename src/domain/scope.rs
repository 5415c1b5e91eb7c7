use std::fmt;

use serde::{Deserialize, Serialize};

/// Keys a [`crate::tracker::ScopeTracker`] can be built over.
///
/// The persisted form is always a string; `from_persisted` must produce a
/// key equal to the runtime key that was written, or restored entries become
/// unreachable.
pub trait ScopeKey: Clone + Eq + std::hash::Hash + fmt::Display {
    fn to_persisted(&self) -> String;
    fn from_persisted(raw: &str) -> Option<Self>;
}

/// Browser tab identifier. Unique while the tab is open.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ScopeKey for TabId {
    fn to_persisted(&self) -> String {
        self.0.to_string()
    }

    fn from_persisted(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().map(TabId)
    }
}

/// Best-effort chat contact identifier derived from page structure.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Trims surrounding whitespace; blank input yields `None`.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ScopeKey for ContactId {
    fn to_persisted(&self) -> String {
        self.0.clone()
    }

    fn from_persisted(raw: &str) -> Option<Self> {
        Self::new(raw)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScopeId {
    Tab(TabId),
    Contact(TabId, ContactId),
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeId::Tab(tab) => write!(f, "tab:{tab}"),
            ScopeId::Contact(tab, contact) => write!(f, "tab:{tab}/contact:{contact}"),
        }
    }
}
