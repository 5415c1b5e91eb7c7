use std::time::{Duration, Instant};

use autolang_core::LanguageLabel::{English, Hebrew};
use serde_json::json;

use super::support::{ScriptedChannel, memory_store, shared_from};
use crate::{
    config::Config,
    domain::{ContactId, Failure, Outcome, SkipReason, TabId},
    input::KeyEvent,
    page::{InitStep, PageAgent},
    protocol::PagePush,
    site::{DomSnapshot, WhatsAppWeb},
    store::{MemoryStore, SharedStore, Store},
    tracker::ContactTracker,
};

const WA_URL: &str = "https://web.whatsapp.com/";
const HEADER: &str = "header span[title]";

fn plain_page() -> PageAgent {
    PageAgent::new(TabId(7), "https://example.com/", &Config::default(), None)
}

fn contact_page(store: SharedStore) -> PageAgent {
    let cfg = Config::default();
    let contacts = ContactTracker::new(
        Box::new(WhatsAppWeb::new(cfg.contact_site_host.clone())),
        store,
        &cfg.contact_key_prefix,
        cfg.contact_check_throttle(),
        cfg.contact_min_typed_chars,
    );
    PageAgent::new(TabId(3), WA_URL, &cfg, Some(contacts))
}

fn type_str(page: &mut PageAgent, ch: &mut ScriptedChannel, s: &str) -> Vec<Outcome> {
    s.chars()
        .map(|c| page.on_key(&KeyEvent::typed(c), ch))
        .collect()
}

#[test]
fn typing_hebrew_reports_one_system_inferred_change() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::ok();

    let outcomes = type_str(&mut page, &mut ch, "שלום");
    assert_eq!(outcomes[0], Outcome::Applied);
    assert!(
        outcomes[1..]
            .iter()
            .all(|o| *o == Outcome::Skipped(SkipReason::AlreadyCurrent))
    );
    assert_eq!(ch.updates(), vec![(Hebrew, true)]);
    assert_eq!(page.current_language(), Hebrew);
}

#[test]
fn detection_can_be_configured_as_user_initiated() {
    let cfg = Config {
        switch_on_detection: false,
        ..Default::default()
    };
    let mut page = PageAgent::new(TabId(1), "https://example.com/", &cfg, None);
    let mut ch = ScriptedChannel::ok();

    type_str(&mut page, &mut ch, "ש");
    assert_eq!(ch.updates(), vec![(Hebrew, false)]);
}

#[test]
fn digits_and_punctuation_carry_no_signal() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::ok();

    let outcomes = type_str(&mut page, &mut ch, "12 ,.");
    assert!(
        outcomes
            .iter()
            .all(|o| *o == Outcome::Skipped(SkipReason::NoScriptSignal))
    );
    assert!(ch.requests.is_empty());
    assert_eq!(page.typed().len(), 5);
}

#[test]
fn shortcuts_are_ignored() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::ok();
    let ctrl_s = KeyEvent {
        key: "ש".to_string(),
        ctrl: true,
        ..Default::default()
    };

    assert_eq!(page.on_key(&ctrl_s, &mut ch), Outcome::Skipped(SkipReason::ModifierHeld));
    assert_eq!(page.current_language(), English);
    assert!(page.typed().is_empty());
}

#[test]
fn manual_toggle_flips_without_external_switch_and_clears_buffer() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::ok();
    type_str(&mut page, &mut ch, "ab");

    assert_eq!(page.on_key(&KeyEvent::alt_shift(), &mut ch), Outcome::Applied);
    assert_eq!(page.current_language(), Hebrew);
    assert!(page.typed().is_empty());
    assert_eq!(ch.updates(), vec![(Hebrew, false)]);

    page.on_key(&KeyEvent::alt_shift(), &mut ch);
    assert_eq!(page.current_language(), English);
}

#[test]
fn channel_failure_is_reported_but_ambient_state_still_moves() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::failing(1);

    let outcome = page.on_key(&KeyEvent::typed('ש'), &mut ch);
    assert_eq!(outcome, Outcome::Failed(Failure::ChannelError));
    assert_eq!(page.current_language(), Hebrew);
}

#[test]
fn push_sets_ambient_language() {
    let mut page = plain_page();
    page.on_push(PagePush::SetLanguage { language: Hebrew });
    assert_eq!(page.current_language(), Hebrew);
}

#[test]
fn initialize_adopts_coordinator_language() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::answering(Hebrew);
    assert_eq!(page.initialize(&mut ch, 3), InitStep::Done(Hebrew));
    assert_eq!(page.current_language(), Hebrew);
}

#[test]
fn initialize_retries_then_gives_up_to_english() {
    let mut page = plain_page();
    page.on_push(PagePush::SetLanguage { language: Hebrew });
    let mut ch = ScriptedChannel::failing(10);

    assert_eq!(
        page.initialize(&mut ch, 1),
        InitStep::RetryAfter {
            delay: Duration::from_millis(200),
            retries_left: 0
        }
    );
    assert_eq!(page.initialize(&mut ch, 0), InitStep::GaveUp);
    assert_eq!(page.current_language(), English);
}

#[test]
fn plain_pages_have_no_contact_tracking() {
    let mut page = plain_page();
    let mut ch = ScriptedChannel::ok();
    assert_eq!(
        page.check_contact_switch(&mut ch, Instant::now()),
        Outcome::Skipped(SkipReason::ContactsDisabled)
    );
}

#[test]
fn typing_saves_contact_language_after_threshold() {
    let (mem, store) = memory_store();
    let mut page = contact_page(store);
    let mut ch = ScriptedChannel::ok();
    page.on_dom(DomSnapshot::new(WA_URL).with_text(HEADER, "Alice"));

    type_str(&mut page, &mut ch, "של");
    assert!(page.contact_languages().is_empty());

    type_str(&mut page, &mut ch, "ו");
    let alice = ContactId::new("Alice").unwrap();
    assert_eq!(page.contact_languages(), vec![(alice, Hebrew)]);

    assert_eq!(
        mem.borrow().get("whatsapp_contact_Alice").unwrap(),
        Some(json!("hebrew"))
    );
}

#[test]
fn switching_to_remembered_contact_changes_ambient_and_switches() {
    let persisted = MemoryStore::new().with_entry("whatsapp_contact_Alice", json!("hebrew"));
    let (_, store) = shared_from(persisted);
    let mut page = contact_page(store);
    let mut ch = ScriptedChannel::ok();
    page.on_dom(DomSnapshot::new(WA_URL).with_text(HEADER, "Alice"));

    assert_eq!(page.check_contact_switch(&mut ch, Instant::now()), Outcome::Applied);
    assert_eq!(page.current_language(), Hebrew);
    assert_eq!(page.current_contact(), ContactId::new("Alice").as_ref());
    assert_eq!(ch.updates(), vec![(Hebrew, true)]);
}

#[test]
fn switching_to_unknown_contact_leaves_ambient_alone() {
    let (_, store) = memory_store();
    let mut page = contact_page(store);
    let mut ch = ScriptedChannel::ok();
    page.on_push(PagePush::SetLanguage { language: Hebrew });
    page.on_dom(DomSnapshot::new(WA_URL).with_text(HEADER, "Bob"));

    assert_eq!(
        page.check_contact_switch(&mut ch, Instant::now()),
        Outcome::Skipped(SkipReason::ContactUnknown)
    );
    assert_eq!(page.current_language(), Hebrew);
    assert!(ch.requests.is_empty());
}
