//! Keyboard shortcut matching
//!
//! A binding fires only with exactly its own modifier held, so native
//! browser shortcuts with extra modifiers (Ctrl+Shift+Z and friends) are
//! left alone.

use serde::{Deserialize, Serialize};

/// A keydown as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyInput {
    /// Key with no modifiers
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// Key with only Ctrl held
    pub fn ctrl(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: true,
            ..Default::default()
        }
    }

    fn key_matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    /// `key` pressed with no modifier held
    pub fn is_key(&self, key: &str) -> bool {
        !self.alt && !self.shift && !self.ctrl && !self.meta && self.key_matches(key)
    }

    /// `key` pressed with ctrl and neither alt nor shift
    pub fn is_ctrl_key(&self, key: &str) -> bool {
        !self.alt && !self.shift && !self.meta && self.ctrl && self.key_matches(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shortcut {
    OpenEquation,
    Undo,
    Redo,
    Close,
}

impl Shortcut {
    pub fn from_key(input: &KeyInput) -> Option<Self> {
        if input.is_ctrl_key("e") {
            Some(Shortcut::OpenEquation)
        } else if input.is_ctrl_key("z") {
            Some(Shortcut::Undo)
        } else if input.is_ctrl_key("y") {
            Some(Shortcut::Redo)
        } else if input.is_key("Escape") {
            Some(Shortcut::Close)
        } else {
            None
        }
    }
}

/// Whether the host should still run its default handling for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyOutcome {
    /// Consumed; the host must prevent the default action
    Handled,
    /// Not ours; let the browser (or the host's own history) handle it
    PassThrough,
}
