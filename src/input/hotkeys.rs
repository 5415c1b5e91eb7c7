use serde::{Deserialize, Serialize};

use crate::config::ManualToggle;

/// A keydown as reported by the page. `key` follows the DOM `KeyboardEvent.key`
/// naming: a single character for printable keys, a name like `"Shift"` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn typed(ch: char) -> Self {
        Self {
            key: ch.to_string(),
            ..Default::default()
        }
    }

    /// The last key of an Alt+Shift chord, pressed in either order.
    pub fn alt_shift() -> Self {
        Self {
            key: "Shift".to_string(),
            alt: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Ctrl/Meta shortcuts never count as typing.
    Shortcut,
    ManualToggle,
    Typed(char),
    /// Named keys (arrows, lone modifiers) and Alt-chords.
    NonPrintable,
}

fn is_toggle_chord(ev: &KeyEvent, toggle: ManualToggle) -> bool {
    match toggle {
        ManualToggle::AltShift => {
            !ev.ctrl
                && !ev.meta
                && ((ev.key == "Shift" && ev.alt) || (ev.key == "Alt" && ev.shift))
        }
        ManualToggle::CtrlShift => {
            !ev.alt
                && !ev.meta
                && ((ev.key == "Shift" && ev.ctrl) || (ev.key == "Control" && ev.shift))
        }
        ManualToggle::Disabled => false,
    }
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

pub fn interpret(ev: &KeyEvent, toggle: ManualToggle) -> KeyAction {
    if is_toggle_chord(ev, toggle) {
        return KeyAction::ManualToggle;
    }

    if ev.ctrl || ev.meta {
        return KeyAction::Shortcut;
    }

    match single_char(&ev.key) {
        Some(ch) if !ev.alt && !ch.is_control() => KeyAction::Typed(ch),
        _ => KeyAction::NonPrintable,
    }
}
