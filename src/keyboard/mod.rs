// Keyboard output module - the sink that edits the focused document
// The engine only needs three operations; KeyboardSimulator implements them with enigo

pub mod synth;

pub use synth::KeyboardSimulator;

/// Errors raised while synthesizing keystrokes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    /// The platform keyboard backend could not be created
    #[error("Failed to create keyboard simulator: {0}")]
    Unavailable(String),
    /// A key event could not be posted
    #[error("Failed to send key event: {0}")]
    EventFailed(String),
    /// Shutdown was signaled before the sequence started
    #[error("Keyboard output skipped during shutdown")]
    ShuttingDown,
}

/// Destination for synthetic editing commands.
///
/// Commands for one expansion are issued strictly in order: delete, type,
/// then cursor moves.
pub trait OutputSink: Send {
    /// Delete `count` characters before the cursor
    fn delete_backward(&mut self, count: usize) -> Result<(), SinkError>;
    /// Type `text` at the cursor
    fn type_text(&mut self, text: &str) -> Result<(), SinkError>;
    /// Move the cursor `count` characters to the left
    fn move_cursor_left(&mut self, count: usize) -> Result<(), SinkError>;
}

/// A single recorded sink command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCommand {
    DeleteBackward(usize),
    TypeText(String),
    MoveCursorLeft(usize),
}

pub mod test_fixtures {
    use super::{OutputSink, SinkCommand, SinkError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Sink that records every command into a shared log
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        commands: Arc<Mutex<Vec<SinkCommand>>>,
        fail_on_type: bool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sink whose type_text always fails
        pub fn failing_on_type() -> Self {
            Self {
                fail_on_type: true,
                ..Self::default()
            }
        }

        pub fn commands(&self) -> Vec<SinkCommand> {
            self.commands.lock().clone()
        }
    }

    impl OutputSink for RecordingSink {
        fn delete_backward(&mut self, count: usize) -> Result<(), SinkError> {
            self.commands.lock().push(SinkCommand::DeleteBackward(count));
            Ok(())
        }

        fn type_text(&mut self, text: &str) -> Result<(), SinkError> {
            if self.fail_on_type {
                return Err(SinkError::EventFailed("type failed".to_string()));
            }
            self.commands.lock().push(SinkCommand::TypeText(text.to_string()));
            Ok(())
        }

        fn move_cursor_left(&mut self, count: usize) -> Result<(), SinkError> {
            self.commands.lock().push(SinkCommand::MoveCursorLeft(count));
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "keyboard_test.rs"]
mod tests;
