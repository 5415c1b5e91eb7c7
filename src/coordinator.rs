//! The privileged background context.
//!
//! Owns the tab-scoped [`ScopeTracker`], answers [`Request`]s from pages and
//! the popup, reacts to tab activation and removal, and drives the
//! [`Notifier`].

use std::time::Instant;

use autolang_core::LanguageLabel;

use crate::{
    config::constants::TAB_LANGUAGES_KEY,
    domain::TabId,
    errors::ChannelError,
    notify::{ExternalSignal, Notifier},
    protocol::{DebugState, PagePush, Request, Response, TabEntry},
    store::SharedStore,
    tracker::{Persistence, ScopeTracker},
};

pub struct Coordinator {
    tabs: ScopeTracker<TabId>,
    notifier: Notifier,
    connected: bool,
}

impl Coordinator {
    pub fn new(store: SharedStore, signal: Box<dyn ExternalSignal>) -> Self {
        Self {
            tabs: ScopeTracker::new(
                store,
                Persistence::Snapshot {
                    key: TAB_LANGUAGES_KEY.to_string(),
                },
            ),
            notifier: Notifier::new(signal),
            connected: true,
        }
    }

    /// Loads persisted tab languages. Returns how many were restored.
    pub fn start(&mut self) -> usize {
        self.tabs.restore_from_store()
    }

    /// Stops accepting requests; pages see [`ChannelError::Disconnected`].
    /// Trigger artifacts still waiting for cleanup are removed.
    pub fn shutdown(&mut self) {
        tracing::info!("coordinator shutting down");
        self.connected = false;
        self.notifier.flush();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn handle(
        &mut self,
        sender: Option<TabId>,
        request: Request,
        now: Instant,
    ) -> Result<Response, ChannelError> {
        if !self.connected {
            return Err(ChannelError::Disconnected);
        }

        tracing::trace!(sender = ?sender, action = request.name(), "request received");

        match request {
            Request::UpdateLanguage {
                language,
                trigger_switch,
            } => {
                let tab = sender.ok_or(ChannelError::NoSenderScope)?;
                let changed = self.tabs.set_language(tab, language);
                tracing::debug!(tab = %tab, language = %language, changed, trigger_switch, "language update");

                if changed && trigger_switch {
                    self.notifier.request_switch(language, "page update", now);
                }
                Ok(Response::ok())
            }
            Request::SwitchKeyboard { language } => {
                self.notifier.request_switch(language, "direct request", now);
                Ok(Response::ok())
            }
            Request::UpdateLanguageForScope { scope_id, language } => {
                tracing::debug!(tab = %scope_id, language = %language, "explicit language override");
                self.tabs.force_language(scope_id, language);
                self.notifier
                    .push(scope_id, PagePush::SetLanguage { language });
                Ok(Response::ok())
            }
            Request::GetLanguage => {
                let language = match sender {
                    Some(tab) => self.tabs.get_language(&tab),
                    None => {
                        tracing::debug!("language query without a sender tab");
                        LanguageLabel::default()
                    }
                };
                Ok(Response::Language { language })
            }
            Request::GetLanguageForScope { scope_id } => Ok(Response::Language {
                language: self.tabs.get_language(&scope_id),
            }),
            Request::DebugState => Ok(Response::DebugState(self.debug_state())),
        }
    }

    /// Switches the OS layout to the activated tab's remembered language and
    /// tells its page. A tab without a record is left alone.
    pub fn on_tab_activated(&mut self, tab: TabId, now: Instant) -> Option<LanguageLabel> {
        let Some(language) = self.tabs.recorded(&tab) else {
            tracing::debug!(tab = %tab, "no remembered language for activated tab");
            return None;
        };

        self.notifier
            .request_switch(language, "tab activated", now);
        self.notifier.push(tab, PagePush::SetLanguage { language });
        Some(language)
    }

    pub fn on_tab_removed(&mut self, tab: TabId) -> bool {
        self.tabs.remove_scope(&tab)
    }

    pub fn debug_state(&self) -> DebugState {
        let mut tabs: Vec<TabEntry> = self
            .tabs
            .entries()
            .into_iter()
            .map(|(id, lang)| TabEntry { id, lang })
            .collect();
        tabs.sort_by_key(|t| t.id);

        DebugState {
            tab_count: tabs.len(),
            tabs,
        }
    }

    pub fn tabs(&self) -> &ScopeTracker<TabId> {
        &self.tabs
    }

    pub fn take_pushes(&mut self) -> Vec<(TabId, PagePush)> {
        self.notifier.take_pushes()
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.notifier.next_deadline()
    }

    /// A [`Channel`](crate::protocol::Channel) bound to `sender`.
    pub fn port(&mut self, sender: Option<TabId>, now: Instant) -> Port<'_> {
        Port {
            coordinator: self,
            sender,
            now,
        }
    }
}

pub struct Port<'a> {
    coordinator: &'a mut Coordinator,
    sender: Option<TabId>,
    now: Instant,
}

impl crate::protocol::Channel for Port<'_> {
    fn send(&mut self, request: Request) -> Result<Response, ChannelError> {
        self.coordinator.handle(self.sender, request, self.now)
    }
}
