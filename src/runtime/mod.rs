//! Single-threaded event loop.
//!
//! Events are applied in delivery order. Deferred work (click-delayed
//! contact checks, initial-language retries, trigger cleanup) waits in a
//! timer queue until [`EventLoop::advance`] is called with a later instant.

pub mod timers;

use std::{collections::HashMap, time::Instant};

use serde::{Deserialize, Serialize};
use url::Url;

pub use timers::{Timer, TimerQueue};

use crate::{
    config::Config,
    coordinator::Coordinator,
    domain::{Outcome, TabId},
    errors::{ChannelError, ErrorClass, swallow},
    input::KeyEvent,
    notify::ExternalSignal,
    page::{InitStep, PageAgent},
    protocol::{PagePush, Request, Response},
    site::{DomSnapshot, WhatsAppWeb, host_matches},
    store::SharedStore,
    tracker::ContactTracker,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    PageLoaded {
        tab: TabId,
        url: String,
    },
    Key {
        tab: TabId,
        #[serde(flatten)]
        key: KeyEvent,
    },
    Click {
        tab: TabId,
    },
    FocusIn {
        tab: TabId,
        #[serde(default)]
        message_input: bool,
    },
    Dom {
        tab: TabId,
        snapshot: DomSnapshot,
    },
    Visible {
        tab: TabId,
    },
    TabActivated {
        tab: TabId,
    },
    TabRemoved {
        tab: TabId,
    },
    /// Request from a surface that is not bound to a tab (the popup).
    Popup {
        request: Request,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    Reply { action: String, response: Response },
    Push { tab: TabId, message: PagePush },
}

pub struct EventLoop {
    config: Config,
    store: SharedStore,
    coordinator: Coordinator,
    pages: HashMap<TabId, PageAgent>,
    timers: TimerQueue,
    outputs: Vec<Output>,
}

impl EventLoop {
    pub fn new(config: Config, store: SharedStore, signal: Box<dyn ExternalSignal>) -> Self {
        let coordinator = Coordinator::new(store.clone(), signal);
        Self {
            config,
            store,
            coordinator,
            pages: HashMap::new(),
            timers: TimerQueue::default(),
            outputs: Vec::new(),
        }
    }

    pub fn start(&mut self) -> usize {
        self.coordinator.start()
    }

    /// Drops pending timers and shuts the coordinator down.
    pub fn shutdown(&mut self) {
        self.timers = TimerQueue::default();
        self.coordinator.shutdown();
    }

    pub fn dispatch(&mut self, event: Event, now: Instant) -> Option<Outcome> {
        let outcome = match event {
            Event::PageLoaded { tab, url } => {
                self.open_page(tab, &url, now);
                None
            }
            Event::Key { tab, key } => {
                let page = self.pages.get_mut(&tab)?;
                let mut port = self.coordinator.port(Some(tab), now);
                Some(page.on_key(&key, &mut port))
            }
            Event::Click { tab } => {
                let page = self.pages.get(&tab)?;
                if page.has_contacts() {
                    self.timers
                        .schedule(now + self.config.contact_click_delay(), Timer::ContactCheck(tab));
                }
                None
            }
            Event::FocusIn { tab, message_input } => {
                if !message_input {
                    return None;
                }
                let page = self.pages.get_mut(&tab)?;
                let mut port = self.coordinator.port(Some(tab), now);
                Some(page.check_contact_switch(&mut port, now))
            }
            Event::Dom { tab, snapshot } => {
                self.pages.get_mut(&tab)?.on_dom(snapshot);
                None
            }
            Event::Visible { tab } => {
                self.timers.schedule(
                    now,
                    Timer::InitLanguage {
                        tab,
                        retries_left: self.config.visibility_retries,
                    },
                );
                self.advance(now);
                None
            }
            Event::TabActivated { tab } => {
                self.coordinator.on_tab_activated(tab, now);
                None
            }
            Event::TabRemoved { tab } => {
                self.coordinator.on_tab_removed(tab);
                self.timers.cancel_tab(tab);
                self.pages.remove(&tab);
                None
            }
            Event::Popup { request } => {
                let action = request.name().to_string();
                if let Some(response) = swallow(
                    ErrorClass::Channel,
                    &action,
                    self.coordinator.handle(None, request, now),
                ) {
                    self.outputs.push(Output::Reply { action, response });
                }
                None
            }
        };

        self.deliver_pushes();
        outcome
    }

    fn open_page(&mut self, tab: TabId, url: &str, now: Instant) {
        let contacts = self.contact_tracker_for(url);
        tracing::debug!(tab = %tab, url, contacts = contacts.is_some(), "page loaded");

        self.timers.cancel_tab(tab);
        self.pages
            .insert(tab, PageAgent::new(tab, url, &self.config, contacts));
        self.timers.schedule(
            now + self.config.init_delay(),
            Timer::InitLanguage {
                tab,
                retries_left: self.config.init_retries,
            },
        );
    }

    fn contact_tracker_for(&self, url: &str) -> Option<ContactTracker> {
        let cfg = &self.config;
        let on_site = Url::parse(url).is_ok_and(|u| host_matches(&u, &cfg.contact_site_host));
        if !cfg.per_contact_mode || !on_site {
            return None;
        }

        Some(ContactTracker::new(
            Box::new(WhatsAppWeb::new(cfg.contact_site_host.clone())),
            self.store.clone(),
            &cfg.contact_key_prefix,
            cfg.contact_check_throttle(),
            cfg.contact_min_typed_chars,
        ))
    }

    /// Fires every timer due at `now`, then the coordinator's housekeeping.
    pub fn advance(&mut self, now: Instant) {
        for timer in self.timers.pop_due(now) {
            self.fire(timer, now);
        }
        self.coordinator.tick(now);
        self.deliver_pushes();
    }

    fn fire(&mut self, timer: Timer, now: Instant) {
        match timer {
            Timer::ContactCheck(tab) => {
                let Some(page) = self.pages.get_mut(&tab) else {
                    return;
                };
                let mut port = self.coordinator.port(Some(tab), now);
                let outcome = page.check_contact_switch(&mut port, now);
                tracing::trace!(tab = %tab, ?outcome, "contact check");
            }
            Timer::InitLanguage { tab, retries_left } => {
                let Some(page) = self.pages.get_mut(&tab) else {
                    return;
                };
                let mut port = self.coordinator.port(Some(tab), now);
                if let InitStep::RetryAfter {
                    delay,
                    retries_left,
                } = page.initialize(&mut port, retries_left)
                {
                    self.timers
                        .schedule(now + delay, Timer::InitLanguage { tab, retries_left });
                }
            }
        }
    }

    fn deliver_pushes(&mut self) {
        for (tab, push) in self.coordinator.take_pushes() {
            let delivered = match self.pages.get_mut(&tab) {
                Some(page) => {
                    page.on_push(push);
                    Ok(())
                }
                None => Err(ChannelError::NoListener(tab.0)),
            };
            swallow(ErrorClass::Channel, "setLanguage", delivered);
            self.outputs.push(Output::Push { tab, message: push });
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.timers.next_deadline(), self.coordinator.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn take_outputs(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.outputs)
    }

    pub fn page(&self, tab: TabId) -> Option<&PageAgent> {
        self.pages.get(&tab)
    }

    pub fn page_mut(&mut self, tab: TabId) -> Option<&mut PageAgent> {
        self.pages.get_mut(&tab)
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
