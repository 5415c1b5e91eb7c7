use url::Url;

use super::{ContactSource, DomSnapshot, host_matches};
use crate::domain::ContactId;

/// Header elements carrying the contact or group name, most specific first.
pub const HEADER_NAME_SELECTORS: [&str; 3] = [
    r#"header [role="button"] span[dir="auto"]"#,
    "header span[title]",
    r#"div[data-tab="1"] span.x1iyjqo2"#,
];

pub const ACTIVE_CHAT_SELECTOR: &str = r#"[data-tab="1"]"#;
pub const ACTIVE_CHAT_ATTRS: [&str; 2] = ["data-id", "data-testid"];
pub const UNKNOWN_CHAT: &str = "unknown-chat";

/// Contact heuristics for the WhatsApp web client. The first strategy that
/// yields a non-empty identifier wins.
#[derive(Debug, Clone)]
pub struct WhatsAppWeb {
    host: String,
}

impl WhatsAppWeb {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    fn from_header(page: &DomSnapshot) -> Option<ContactId> {
        HEADER_NAME_SELECTORS
            .iter()
            .filter_map(|sel| page.query(sel))
            .find_map(|e| e.trimmed_text().and_then(ContactId::new))
    }

    /// First non-empty path segment after the first one, e.g. `/chat/<id>`.
    fn from_path(url: &Url) -> Option<ContactId> {
        url.path_segments()?.skip(1).find_map(ContactId::new)
    }

    fn from_active_chat(page: &DomSnapshot) -> Option<ContactId> {
        let chat = page.query(ACTIVE_CHAT_SELECTOR)?;
        let id = ACTIVE_CHAT_ATTRS
            .iter()
            .find_map(|name| chat.attr(name))
            .unwrap_or(UNKNOWN_CHAT);
        ContactId::new(id)
    }
}

impl ContactSource for WhatsAppWeb {
    fn current_contact_id(&self, page: &DomSnapshot) -> Option<ContactId> {
        let url = page.parsed_url()?;
        if !host_matches(&url, &self.host) {
            return None;
        }

        Self::from_header(page)
            .or_else(|| Self::from_path(&url))
            .or_else(|| Self::from_active_chat(page))
    }
}
