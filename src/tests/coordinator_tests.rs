use std::time::Instant;

use autolang_core::LanguageLabel::{English, Hebrew};
use serde_json::json;
use tracing_test::traced_test;

use super::support::{FailingSignal, RecordingSignal, memory_store, shared_from};
use crate::{
    config::constants::TAB_LANGUAGES_KEY,
    coordinator::Coordinator,
    domain::TabId,
    errors::ChannelError,
    protocol::{Channel, PagePush, Request, Response, TabEntry},
    store::{MemoryStore, Store},
};

fn update(language: autolang_core::LanguageLabel, trigger_switch: bool) -> Request {
    Request::UpdateLanguage {
        language,
        trigger_switch,
    }
}

#[test]
fn update_from_page_records_and_switches_once() {
    let (_, store) = memory_store();
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();

    let reply = coord.handle(Some(TabId(7)), update(Hebrew, true), now).unwrap();
    assert!(reply.succeeded());
    coord.handle(Some(TabId(7)), update(Hebrew, true), now).unwrap();

    assert_eq!(*sent.borrow(), vec![Hebrew]);
    assert_eq!(coord.tabs().get_language(&TabId(7)), Hebrew);
}

#[test]
fn user_initiated_update_does_not_switch() {
    let (_, store) = memory_store();
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));

    coord
        .handle(Some(TabId(1)), update(Hebrew, false), Instant::now())
        .unwrap();
    assert!(sent.borrow().is_empty());
    assert_eq!(coord.tabs().get_language(&TabId(1)), Hebrew);
}

#[test]
fn update_without_sender_is_a_channel_error() {
    let (_, store) = memory_store();
    let (signal, _) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));

    assert_eq!(
        coord.handle(None, update(Hebrew, true), Instant::now()),
        Err(ChannelError::NoSenderScope)
    );
}

#[test]
fn get_language_defaults_to_english() {
    let (_, store) = memory_store();
    let (signal, _) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();

    let reply = coord.handle(Some(TabId(3)), Request::GetLanguage, now).unwrap();
    assert_eq!(reply.language(), Some(English));

    let reply = coord.handle(None, Request::GetLanguage, now).unwrap();
    assert_eq!(reply.language(), Some(English));
}

#[test]
fn explicit_override_applies_and_pushes_to_page() {
    let (_, store) = memory_store();
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();

    coord
        .handle(
            None,
            Request::UpdateLanguageForScope {
                scope_id: TabId(4),
                language: Hebrew,
            },
            now,
        )
        .unwrap();

    let reply = coord
        .handle(None, Request::GetLanguageForScope { scope_id: TabId(4) }, now)
        .unwrap();
    assert_eq!(reply.language(), Some(Hebrew));
    assert_eq!(
        coord.take_pushes(),
        vec![(TabId(4), PagePush::SetLanguage { language: Hebrew })]
    );
    assert!(sent.borrow().is_empty());
}

#[test]
fn switch_keyboard_always_signals() {
    let (_, store) = memory_store();
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();

    coord
        .handle(Some(TabId(2)), Request::SwitchKeyboard { language: English }, now)
        .unwrap();
    coord
        .handle(Some(TabId(2)), Request::SwitchKeyboard { language: English }, now)
        .unwrap();
    assert_eq!(*sent.borrow(), vec![English, English]);
}

#[test]
fn activation_of_recorded_tab_switches_and_pushes() {
    let (_, store) = memory_store();
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();
    coord.handle(Some(TabId(7)), update(Hebrew, false), now).unwrap();

    assert_eq!(coord.on_tab_activated(TabId(7), now), Some(Hebrew));
    assert_eq!(*sent.borrow(), vec![Hebrew]);
    assert_eq!(
        coord.take_pushes(),
        vec![(TabId(7), PagePush::SetLanguage { language: Hebrew })]
    );
}

#[test]
fn activation_of_unknown_tab_does_nothing() {
    let (_, store) = memory_store();
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));

    assert_eq!(coord.on_tab_activated(TabId(8), Instant::now()), None);
    assert!(sent.borrow().is_empty());
    assert!(coord.take_pushes().is_empty());
}

#[test]
fn removed_tab_forgets_its_language() {
    let (mem, store) = memory_store();
    let (signal, _) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();
    coord.handle(Some(TabId(7)), update(Hebrew, false), now).unwrap();

    assert!(coord.on_tab_removed(TabId(7)));
    assert_eq!(coord.tabs().get_language(&TabId(7)), English);
    assert!(!coord.on_tab_removed(TabId(7)));

    assert_eq!(mem.borrow().get(TAB_LANGUAGES_KEY).unwrap(), Some(json!({})));
}

#[test]
fn start_restores_persisted_tabs() {
    let persisted =
        MemoryStore::new().with_entry(TAB_LANGUAGES_KEY, json!({ "7": "hebrew", "9": "english" }));
    let (_, store) = shared_from(persisted);
    let (signal, sent) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));

    assert_eq!(coord.start(), 2);
    assert_eq!(coord.on_tab_activated(TabId(7), Instant::now()), Some(Hebrew));
    assert_eq!(*sent.borrow(), vec![Hebrew]);
}

#[test]
fn debug_state_lists_tabs_in_order() {
    let (_, store) = memory_store();
    let (signal, _) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    let now = Instant::now();
    coord.handle(Some(TabId(9)), update(Hebrew, false), now).unwrap();
    coord.handle(Some(TabId(2)), update(Hebrew, false), now).unwrap();

    let Response::DebugState(state) = coord.handle(None, Request::DebugState, now).unwrap() else {
        panic!("expected debug state");
    };
    assert_eq!(state.tab_count, 2);
    assert_eq!(
        state.tabs,
        vec![
            TabEntry {
                id: TabId(2),
                lang: Hebrew
            },
            TabEntry {
                id: TabId(9),
                lang: Hebrew
            },
        ]
    );
}

#[test]
fn shut_down_coordinator_rejects_ports() {
    let (_, store) = memory_store();
    let (signal, _) = RecordingSignal::new();
    let mut coord = Coordinator::new(store, Box::new(signal));
    assert!(coord.is_connected());
    coord.shutdown();
    assert!(!coord.is_connected());

    let mut port = coord.port(Some(TabId(1)), Instant::now());
    assert_eq!(port.send(Request::GetLanguage), Err(ChannelError::Disconnected));
}

#[traced_test]
#[test]
fn failed_handoff_is_swallowed() {
    let (_, store) = memory_store();
    let mut coord = Coordinator::new(store, Box::new(FailingSignal));

    let reply = coord
        .handle(Some(TabId(1)), update(Hebrew, true), Instant::now())
        .unwrap();
    assert!(reply.succeeded());
    assert_eq!(coord.tabs().get_language(&TabId(1)), Hebrew);
    assert!(logs_contain("handoff"));
}
