//! Messages exchanged between pages, the popup and the coordinator.
//!
//! The wire names match the extension's JSON messages (`action` tag,
//! camelCase fields). The sender's tab is never part of a payload; it comes
//! from the channel a request arrives on.

use autolang_core::LanguageLabel;
use serde::{Deserialize, Serialize};

use crate::{domain::TabId, errors::ChannelError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// A page reports its scope's language.
    #[serde(rename_all = "camelCase")]
    UpdateLanguage {
        language: LanguageLabel,
        trigger_switch: bool,
    },
    /// Immediate external switch for the caller's scope.
    SwitchKeyboard { language: LanguageLabel },
    /// Explicit override from a surface not bound to a tab.
    #[serde(rename_all = "camelCase")]
    UpdateLanguageForScope {
        scope_id: TabId,
        language: LanguageLabel,
    },
    GetLanguage,
    #[serde(rename_all = "camelCase")]
    GetLanguageForScope { scope_id: TabId },
    DebugState,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::UpdateLanguage { .. } => "updateLanguage",
            Request::SwitchKeyboard { .. } => "switchKeyboard",
            Request::UpdateLanguageForScope { .. } => "updateLanguageForScope",
            Request::GetLanguage => "getLanguage",
            Request::GetLanguageForScope { .. } => "getLanguageForScope",
            Request::DebugState => "debugState",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    pub id: TabId,
    pub lang: LanguageLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugState {
    pub tab_count: usize,
    pub tabs: Vec<TabEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ack { success: bool },
    Language { language: LanguageLabel },
    DebugState(DebugState),
}

impl Response {
    pub const fn ok() -> Self {
        Response::Ack { success: true }
    }

    pub fn language(&self) -> Option<LanguageLabel> {
        match self {
            Response::Language { language } => Some(*language),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Response::Ack { success: true })
    }
}

/// Coordinator-to-page notifications. No reply is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PagePush {
    SetLanguage { language: LanguageLabel },
}

/// Request/response link from a page (or the popup) to the coordinator.
pub trait Channel {
    fn send(&mut self, request: Request) -> Result<Response, ChannelError>;
}
