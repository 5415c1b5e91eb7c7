//! Page-level agent, one per tab.
//!
//! Holds the ambient language the page believes it is typing in, reacts to
//! keystrokes and contact switches, and reports changes to the coordinator
//! over a [`Channel`].

use std::time::{Duration, Instant};

use autolang_core::{LanguageLabel, classify};

use crate::{
    config::{Config, ManualToggle},
    domain::{ContactId, Outcome, ScopeId, SkipReason, TabId},
    errors::{ErrorClass, swallow},
    input::{DetectionBuffer, KeyAction, KeyEvent, interpret},
    notify::announce_change,
    protocol::{Channel, PagePush, Request},
    site::DomSnapshot,
    tracker::ContactTracker,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStep {
    Done(LanguageLabel),
    RetryAfter { delay: Duration, retries_left: u32 },
    /// Retry budget spent; the page fell back to English.
    GaveUp,
}

pub struct PageAgent {
    tab: TabId,
    current: LanguageLabel,
    buffer: DetectionBuffer,
    dom: DomSnapshot,
    contacts: Option<ContactTracker>,
    toggle: ManualToggle,
    switch_on_detection: bool,
    retry_backoff: Duration,
}

impl PageAgent {
    pub fn new(tab: TabId, url: &str, cfg: &Config, contacts: Option<ContactTracker>) -> Self {
        Self {
            tab,
            current: LanguageLabel::default(),
            buffer: DetectionBuffer::new(cfg.detection_buffer_capacity),
            dom: DomSnapshot::new(url),
            contacts,
            toggle: cfg.manual_toggle,
            switch_on_detection: cfg.switch_on_detection,
            retry_backoff: cfg.init_retry_backoff(),
        }
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn current_language(&self) -> LanguageLabel {
        self.current
    }

    pub fn has_contacts(&self) -> bool {
        self.contacts.is_some()
    }

    pub fn typed(&self) -> &DetectionBuffer {
        &self.buffer
    }

    fn scope(&self) -> ScopeId {
        match self.contacts.as_ref().and_then(ContactTracker::current) {
            Some(contact) => ScopeId::Contact(self.tab, contact.clone()),
            None => ScopeId::Tab(self.tab),
        }
    }

    pub fn on_key(&mut self, ev: &KeyEvent, channel: &mut dyn Channel) -> Outcome {
        match interpret(ev, self.toggle) {
            KeyAction::Shortcut => Outcome::Skipped(SkipReason::ModifierHeld),
            KeyAction::NonPrintable => Outcome::Skipped(SkipReason::NotPrintable),
            KeyAction::ManualToggle => self.manual_toggle(channel),
            KeyAction::Typed(ch) => self.typed_char(ch, channel),
        }
    }

    /// The user already switched layouts, so no external switch is asked for.
    fn manual_toggle(&mut self, channel: &mut dyn Channel) -> Outcome {
        let toggled = self.current.toggled();
        self.current = toggled;
        self.buffer.clear();
        tracing::debug!(tab = %self.tab, language = %toggled, "manual toggle");
        announce_change(channel, &self.scope(), toggled, false)
    }

    fn typed_char(&mut self, ch: char, channel: &mut dyn Channel) -> Outcome {
        self.buffer.push(ch);

        let mut utf8 = [0u8; 4];
        let Some(detected) = classify(ch.encode_utf8(&mut utf8)) else {
            return Outcome::Skipped(SkipReason::NoScriptSignal);
        };

        if detected == self.current {
            self.save_contact_language(detected);
            return Outcome::Skipped(SkipReason::AlreadyCurrent);
        }

        tracing::debug!(tab = %self.tab, from = %self.current, to = %detected, "typed language changed");
        self.current = detected;
        let outcome = announce_change(channel, &self.scope(), detected, self.switch_on_detection);
        self.save_contact_language(detected);
        outcome
    }

    fn save_contact_language(&mut self, label: LanguageLabel) {
        let Some(contacts) = self.contacts.as_mut() else {
            return;
        };
        if let Err(reason) = contacts.save(&self.dom, label, &self.buffer) {
            tracing::trace!(tab = %self.tab, reason = reason.as_str(), "contact save skipped");
        }
    }

    pub fn on_dom(&mut self, snapshot: DomSnapshot) {
        self.dom = snapshot;
    }

    /// Throttled contact-switch check. A remembered language for the new
    /// contact becomes the ambient language; the OS layout is asked to follow
    /// only when that actually changes the ambient language.
    pub fn check_contact_switch(&mut self, channel: &mut dyn Channel, now: Instant) -> Outcome {
        let Some(contacts) = self.contacts.as_mut() else {
            return Outcome::Skipped(SkipReason::ContactsDisabled);
        };

        let switch = match contacts.check_switch(&self.dom, now) {
            Ok(switch) => switch,
            Err(reason) => return Outcome::Skipped(reason),
        };

        let Some(remembered) = switch.remembered else {
            tracing::debug!(tab = %self.tab, contact = %switch.contact, "no remembered language for contact");
            return Outcome::Skipped(SkipReason::ContactUnknown);
        };

        if remembered == self.current {
            return Outcome::Skipped(SkipReason::AlreadyCurrent);
        }

        self.current = remembered;
        let scope = ScopeId::Contact(self.tab, switch.contact);
        announce_change(channel, &scope, remembered, true)
    }

    pub fn on_push(&mut self, push: PagePush) {
        match push {
            PagePush::SetLanguage { language } => {
                tracing::debug!(tab = %self.tab, from = %self.current, to = %language, "language set by coordinator");
                self.current = language;
            }
        }
    }

    /// Asks the coordinator for this tab's remembered language.
    pub fn initialize(&mut self, channel: &mut dyn Channel, retries_left: u32) -> InitStep {
        let reply = swallow(
            ErrorClass::Channel,
            Request::GetLanguage.name(),
            channel.send(Request::GetLanguage),
        );

        if let Some(language) = reply.as_ref().and_then(|r| r.language()) {
            self.current = language;
            tracing::debug!(tab = %self.tab, language = %language, "initial language");
            return InitStep::Done(language);
        }

        if retries_left > 0 {
            return InitStep::RetryAfter {
                delay: self.retry_backoff,
                retries_left: retries_left - 1,
            };
        }

        tracing::debug!(tab = %self.tab, "initial language unavailable, using default");
        self.current = LanguageLabel::default();
        InitStep::GaveUp
    }

    pub fn current_contact(&self) -> Option<&ContactId> {
        self.contacts.as_ref().and_then(ContactTracker::current)
    }

    pub fn contact_languages(&self) -> Vec<(ContactId, LanguageLabel)> {
        self.contacts
            .as_ref()
            .map(ContactTracker::languages)
            .unwrap_or_default()
    }

    pub fn clear_contact_memory(&mut self) {
        if let Some(contacts) = self.contacts.as_mut() {
            contacts.clear_memory();
        }
    }
}
