// Keyboard capture module - global key listener feeding the expansion engine
//
// rdev delivers raw key events from the OS hook; translate_event reduces them to
// the logical keys the controller understands and drops everything else.

mod listener;

pub use listener::KeyListener;

use crate::expander::LogicalKey;
use rdev::{EventType, Key};

/// Errors raised by the key listener
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    /// The OS hook thread could not be started
    #[error("Failed to start key listener: {0}")]
    SpawnFailed(String),
}

/// Map a raw rdev event to a logical key.
///
/// Only key presses count. `name` is the text rdev resolved for the press
/// (layout and modifiers applied); anything that is not exactly one printable
/// character is ignored.
pub fn translate_event(event_type: &EventType, name: Option<&str>) -> Option<LogicalKey> {
    let key = match event_type {
        EventType::KeyPress(key) => key,
        _ => return None,
    };

    match key {
        Key::Backspace => Some(LogicalKey::Backspace),
        Key::Space => Some(LogicalKey::Space),
        Key::Tab => Some(LogicalKey::Tab),
        Key::Return | Key::KpReturn => Some(LogicalKey::Enter),
        _ => name.and_then(printable_char).map(LogicalKey::Character),
    }
}

fn printable_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || ch.is_control() {
        return None;
    }
    Some(ch)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
