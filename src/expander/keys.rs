// Logical key events consumed by the expansion controller

use crate::config::Settings;

/// A key press after platform translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// A printable character
    Character(char),
    Backspace,
    Space,
    Tab,
    Enter,
}

impl LogicalKey {
    /// Character the key leaves in the document, if any
    pub fn produced_char(self) -> Option<char> {
        match self {
            LogicalKey::Character(ch) => Some(ch),
            LogicalKey::Space => Some(' '),
            LogicalKey::Tab => Some('\t'),
            LogicalKey::Enter => Some('\n'),
            LogicalKey::Backspace => None,
        }
    }

    /// Whether `settings` allow this key to trigger an expansion
    pub fn triggers_expansion(self, settings: &Settings) -> bool {
        if !settings.enabled {
            return false;
        }
        match self {
            LogicalKey::Space => settings.trigger_on_space,
            LogicalKey::Tab => settings.trigger_on_tab,
            LogicalKey::Enter => settings.trigger_on_enter,
            LogicalKey::Character(_) | LogicalKey::Backspace => false,
        }
    }
}
