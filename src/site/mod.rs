//! Page structure as seen by contact-aware adapters.
//!
//! The page reports the elements an adapter cares about as a
//! [`DomSnapshot`]; adapters turn it into a [`ContactId`]. Selector
//! strategies are site specific and live behind [`ContactSource`].

mod whatsapp;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

pub use whatsapp::WhatsAppWeb;

use crate::domain::ContactId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomElement {
    /// Selector the page matched this element with.
    pub selector: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl DomElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomSnapshot {
    pub url: String,
    #[serde(default)]
    pub elements: Vec<DomElement>,
}

impl DomSnapshot {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.elements.push(DomElement {
            selector: selector.to_string(),
            text: Some(text.to_string()),
            attributes: BTreeMap::new(),
        });
        self
    }

    pub fn with_attr(mut self, selector: &str, name: &str, value: &str) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(name.to_string(), value.to_string());
        self.elements.push(DomElement {
            selector: selector.to_string(),
            text: None,
            attributes,
        });
        self
    }

    /// First element reported for `selector`, like `querySelector`.
    pub fn query(&self, selector: &str) -> Option<&DomElement> {
        self.elements.iter().find(|e| e.selector == selector)
    }

    /// `None` when the page reported something that is not an absolute URL.
    pub fn parsed_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }
}

/// Compares the host only: userinfo, port and letter case are ignored.
pub fn host_matches(url: &Url, host: &str) -> bool {
    url.host_str()
        .is_some_and(|h| h.eq_ignore_ascii_case(host.trim()))
}

/// Site-specific way to name the chat currently on screen.
pub trait ContactSource {
    fn current_contact_id(&self, page: &DomSnapshot) -> Option<ContactId>;
}
