//! Change propagation: page -> coordinator, coordinator -> pages, and the
//! best-effort signal to the out-of-process layout switcher.

mod trigger_file;

use std::time::Instant;

use autolang_core::LanguageLabel;

pub use trigger_file::{TriggerFileSignal, trigger_file_name};

use crate::{
    domain::{Failure, Outcome, ScopeId, TabId},
    errors::{ErrorClass, HandoffError, swallow},
    protocol::{Channel, PagePush, Request},
};

/// Hands a target language to whatever performs the OS layout switch.
///
/// There is no acknowledgement: `Ok` only means the handoff was initiated.
pub trait ExternalSignal {
    fn signal(&mut self, label: LanguageLabel, now: Instant) -> Result<(), HandoffError>;

    /// Runs deferred housekeeping that is due at `now`.
    fn poll(&mut self, _now: Instant) {}

    /// Runs every pending cleanup now, due or not. Called on shutdown.
    fn flush(&mut self) {}

    fn next_deadline(&self) -> Option<Instant> {
        None
    }
}

/// Transport used when no external switcher is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSignal;

impl ExternalSignal for DisabledSignal {
    fn signal(&mut self, label: LanguageLabel, _now: Instant) -> Result<(), HandoffError> {
        tracing::trace!(language = %label, "external signal disabled");
        Ok(())
    }
}

/// Coordinator-side fan-out: external switch requests and page pushes.
pub struct Notifier {
    signal: Box<dyn ExternalSignal>,
    pushes: Vec<(TabId, PagePush)>,
}

impl Notifier {
    pub fn new(signal: Box<dyn ExternalSignal>) -> Self {
        Self {
            signal,
            pushes: Vec::new(),
        }
    }

    /// Fire-and-forget; a failed handoff is logged and dropped.
    pub fn request_switch(&mut self, label: LanguageLabel, reason: &str, now: Instant) -> Outcome {
        tracing::info!(language = %label, reason, "requesting external layout switch");
        match swallow(
            ErrorClass::Handoff,
            "request_switch",
            self.signal.signal(label, now),
        ) {
            Some(()) => Outcome::Applied,
            None => Outcome::Failed(Failure::HandoffError),
        }
    }

    pub fn push(&mut self, tab: TabId, push: PagePush) {
        self.pushes.push((tab, push));
    }

    pub fn take_pushes(&mut self) -> Vec<(TabId, PagePush)> {
        std::mem::take(&mut self.pushes)
    }

    pub fn tick(&mut self, now: Instant) {
        self.signal.poll(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.signal.next_deadline()
    }

    pub fn flush(&mut self) {
        self.signal.flush();
    }
}

/// Page-side: reports a confirmed change of record to the coordinator and,
/// for system-inferred changes, asks it to switch the OS layout as well.
pub fn announce_change(
    channel: &mut dyn Channel,
    scope: &ScopeId,
    label: LanguageLabel,
    request_external_switch: bool,
) -> Outcome {
    tracing::debug!(scope = %scope, language = %label, request_external_switch, "announcing change");
    let request = Request::UpdateLanguage {
        language: label,
        trigger_switch: request_external_switch,
    };

    match swallow(ErrorClass::Channel, request.name(), channel.send(request)) {
        Some(_) => Outcome::Applied,
        None => Outcome::Failed(Failure::ChannelError),
    }
}
