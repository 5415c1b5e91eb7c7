use std::time::{Duration, Instant};

use autolang_core::LanguageLabel;

use super::{Persistence, ScopeTracker, Throttle};
use crate::{
    domain::{ContactId, SkipReason},
    input::DetectionBuffer,
    site::{ContactSource, DomSnapshot},
    store::SharedStore,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactSwitch {
    pub contact: ContactId,
    pub previous: Option<ContactId>,
    /// Language remembered for the new contact, memory first then store.
    pub remembered: Option<LanguageLabel>,
}

/// Remembers a language per chat contact inside one page.
///
/// Contact identification is heuristic, so collisions and missed switches
/// are possible. Entries are never removed.
pub struct ContactTracker {
    memory: ScopeTracker<ContactId>,
    source: Box<dyn ContactSource>,
    throttle: Throttle,
    current: Option<ContactId>,
    min_typed_chars: usize,
}

impl ContactTracker {
    pub fn new(
        source: Box<dyn ContactSource>,
        store: SharedStore,
        key_prefix: &str,
        check_interval: Duration,
        min_typed_chars: usize,
    ) -> Self {
        Self {
            memory: ScopeTracker::new(
                store,
                Persistence::PerKey {
                    prefix: key_prefix.to_string(),
                },
            ),
            source,
            throttle: Throttle::new(check_interval),
            current: None,
            min_typed_chars,
        }
    }

    /// Re-derives the active contact, throttled. A different contact than
    /// last observed counts as a switch.
    pub fn check_switch(
        &mut self,
        page: &DomSnapshot,
        now: Instant,
    ) -> Result<ContactSwitch, SkipReason> {
        if !self.throttle.ready(now) {
            return Err(SkipReason::Throttled);
        }

        let contact = self.source.current_contact_id(page).ok_or(SkipReason::NoContact)?;
        if self.current.as_ref() == Some(&contact) {
            return Err(SkipReason::SameContact);
        }

        let previous = self.current.replace(contact.clone());
        let remembered = self.memory.recall(&contact);
        tracing::debug!(
            contact = %contact,
            previous = ?previous.as_ref().map(ContactId::as_str),
            ?remembered,
            "contact switch"
        );

        Ok(ContactSwitch {
            contact,
            previous,
            remembered,
        })
    }

    /// Saves `label` for the contact on screen once enough characters were
    /// typed and the label is new for that contact.
    pub fn save(
        &mut self,
        page: &DomSnapshot,
        label: LanguageLabel,
        typed: &DetectionBuffer,
    ) -> Result<ContactId, SkipReason> {
        let contact = self.source.current_contact_id(page).ok_or(SkipReason::NoContact)?;

        if !typed.has_at_least(self.min_typed_chars) {
            return Err(SkipReason::BufferTooShort);
        }

        if !self.memory.remember(contact.clone(), label) {
            return Err(SkipReason::AlreadyRemembered);
        }

        tracing::debug!(contact = %contact, language = %label, "contact language saved");
        Ok(contact)
    }

    pub fn current(&self) -> Option<&ContactId> {
        self.current.as_ref()
    }

    pub fn languages(&self) -> Vec<(ContactId, LanguageLabel)> {
        let mut entries = self.memory.entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn clear_memory(&mut self) {
        self.memory.clear_memory();
    }
}
