//! Key bindings with help text.
//!
//! A [`Binding`] groups the key presses that trigger one action together
//! with the short help shown for it.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// One key press: a code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    /// Required modifiers. Shift is ignored when empty.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    /// Whether `msg` is this key press.
    ///
    /// A press declared without modifiers ignores SHIFT, so `r` still
    /// matches with caps lock on, but never matches CONTROL or ALT chords.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if msg.key != self.code {
            return false;
        }
        if self.modifiers.is_empty() {
            return !msg
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        }
        msg.modifiers == self.modifiers
    }
}

/// Help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// The key as shown to the user.
    pub key: String,
    /// What the key does.
    pub desc: String,
}

/// A set of key presses bound to one action, with help text.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// A binding triggered by any of `keys`, without help text.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The key presses that trigger this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Help text shown for this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding can match. A binding without keys never does.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether `msg` triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg { key, modifiers }
    }

    #[test]
    fn test_plain_binding_matches_code() {
        let binding = Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start/stop");
        assert!(binding.matches(&press(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(binding.matches(&press(KeyCode::Char(' '), KeyModifiers::SHIFT)));
        assert!(!binding.matches(&press(KeyCode::Char(' '), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&press(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(binding.help().key, "space");
    }

    #[test]
    fn test_chord_binding_requires_modifiers() {
        let binding = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert!(binding.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut binding = Binding::new(vec![KeyCode::Up]);
        binding.set_enabled(false);
        assert!(!binding.enabled());
        assert!(!binding.matches(&press(KeyCode::Up, KeyModifiers::NONE)));
    }
}
