// Keystroke synthesis via enigo
//
// One process-wide lock serializes synthetic commands so two expansions can
// never interleave their keystrokes. Shutdown is only checked by delete_backward,
// the first command of an expansion; once it has posted, the rest runs to completion.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;

use super::{OutputSink, SinkError};

/// Global lock to prevent interleaving multiple synthetic keyboard sequences.
static KEYBOARD_SYNTH_MUTEX: Mutex<()> = Mutex::new(());

/// Pause between single cursor steps so the target app keeps up
const CURSOR_STEP_DELAY_MS: u64 = 2;

fn lock_synth() -> MutexGuard<'static, ()> {
    KEYBOARD_SYNTH_MUTEX.lock()
}

/// Keyboard simulator sending real key events to the focused application
pub struct KeyboardSimulator {
    enigo: Enigo,
}

impl KeyboardSimulator {
    pub fn new() -> Result<Self, SinkError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(Self { enigo })
    }

    fn click(&mut self, key: Key, count: usize, delay_ms: u64) -> Result<(), SinkError> {
        for _ in 0..count {
            self.enigo
                .key(key, Direction::Click)
                .map_err(|e| SinkError::EventFailed(e.to_string()))?;
            if delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(delay_ms));
            }
        }
        Ok(())
    }
}

impl OutputSink for KeyboardSimulator {
    fn delete_backward(&mut self, count: usize) -> Result<(), SinkError> {
        if count == 0 {
            return Ok(());
        }
        // Don't start a new expansion during shutdown.
        if crate::shutdown::is_shutting_down() {
            return Err(SinkError::ShuttingDown);
        }
        let _guard = lock_synth();
        self.click(Key::Backspace, count, 0)
    }

    fn type_text(&mut self, text: &str) -> Result<(), SinkError> {
        if text.is_empty() {
            return Ok(());
        }
        let _guard = lock_synth();
        self.enigo
            .text(text)
            .map_err(|e| SinkError::EventFailed(e.to_string()))
    }

    fn move_cursor_left(&mut self, count: usize) -> Result<(), SinkError> {
        if count == 0 {
            return Ok(());
        }
        let _guard = lock_synth();
        self.click(Key::LeftArrow, count, CURSOR_STEP_DELAY_MS)
    }
}

#[cfg(test)]
#[path = "synth_test.rs"]
mod tests;
