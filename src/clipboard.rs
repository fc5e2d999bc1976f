// Clipboard access for the {CLIPBOARD} template variable
// System clipboard via copypasta-ext; tests swap in StaticClipboard

use copypasta_ext::prelude::*;

/// Errors reading the clipboard
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard provider is available on this system
    #[error("No clipboard provider available")]
    Unavailable,
    /// The provider failed to return text
    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),
}

pub type ClipboardResult<T> = Result<T, ClipboardError>;

/// Source of clipboard text
pub trait ClipboardService: Send {
    fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String>;
}

/// The OS clipboard. A context is opened per read.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String> {
        let mut ctx = copypasta_ext::try_context().ok_or(ClipboardError::Unavailable)?;
        ctx.get_contents()
            .map_err(|e| ClipboardError::ReadFailed(e.to_string()))
    }
}

pub mod test_fixtures {
    use super::{ClipboardError, ClipboardResult, ClipboardService};

    /// Clipboard double holding fixed content, or failing on every read
    #[derive(Debug, Default, Clone)]
    pub struct StaticClipboard {
        pub content: Option<String>,
    }

    impl StaticClipboard {
        pub fn with_text(text: &str) -> Self {
            Self {
                content: Some(text.to_string()),
            }
        }

        pub fn failing() -> Self {
            Self { content: None }
        }
    }

    impl ClipboardService for StaticClipboard {
        fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String> {
            self.content
                .clone()
                .ok_or_else(|| ClipboardError::ReadFailed("clipboard is empty".to_string()))
        }
    }
}
