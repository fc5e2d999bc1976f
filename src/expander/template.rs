// Template processor - expands {VARIABLE} tokens in replacement text
//
// Built-ins: DATE, TIME, DATETIME, CLIPBOARD, CURSOR. Anything else is looked up
// in the custom variables (upper-cased) and otherwise emitted verbatim.

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::clipboard::{ClipboardService, SystemClipboard};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered replacement text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderResult {
    pub text: String,
    /// Characters between the {CURSOR} anchor and the end of `text`; 0 means no move
    pub cursor_offset: usize,
}

/// Renders replacement templates
pub struct TemplateProcessor {
    clipboard: Mutex<Box<dyn ClipboardService>>,
}

impl TemplateProcessor {
    /// Processor reading {CLIPBOARD} from the system clipboard
    pub fn new() -> Self {
        Self::with_clipboard(Box::new(SystemClipboard))
    }

    pub fn with_clipboard(clipboard: Box<dyn ClipboardService>) -> Self {
        Self {
            clipboard: Mutex::new(clipboard),
        }
    }

    /// Render `template` using local time for the date/time variables.
    ///
    /// `variables` must be keyed by upper-cased name, as held by a snapshot.
    pub fn render(&self, template: &str, variables: &HashMap<String, String>) -> RenderResult {
        self.render_at(template, variables, Local::now().naive_local())
    }

    /// Render with an explicit timestamp for the date/time variables
    pub fn render_at(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
        now: NaiveDateTime,
    ) -> RenderResult {
        if template.is_empty() {
            return RenderResult::default();
        }

        let chars: Vec<char> = template.chars().collect();
        let mut output = String::with_capacity(template.len());
        let mut output_len = 0usize;
        let mut cursor_anchor: Option<usize> = None;

        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '{' {
                if let Some(close) = chars[i + 1..].iter().position(|&c| c == '}') {
                    let end = i + 1 + close;
                    let token: String = chars[i + 1..end].iter().collect();

                    match self.resolve(&token, variables, now) {
                        Token::Cursor => cursor_anchor = Some(output_len),
                        Token::Text(text) => {
                            output_len += text.chars().count();
                            output.push_str(&text);
                        }
                    }

                    i = end + 1;
                    continue;
                }
            }

            output.push(chars[i]);
            output_len += 1;
            i += 1;
        }

        let cursor_offset = cursor_anchor
            .map(|anchor| output_len.saturating_sub(anchor))
            .unwrap_or(0);

        RenderResult {
            text: output,
            cursor_offset,
        }
    }

    fn resolve(
        &self,
        token: &str,
        variables: &HashMap<String, String>,
        now: NaiveDateTime,
    ) -> Token {
        let name = token.to_uppercase();
        match name.as_str() {
            "DATE" => Token::Text(now.format(DATE_FORMAT).to_string()),
            "TIME" => Token::Text(now.format(TIME_FORMAT).to_string()),
            "DATETIME" => Token::Text(now.format(DATETIME_FORMAT).to_string()),
            "CLIPBOARD" => Token::Text(self.read_clipboard()),
            "CURSOR" => Token::Cursor,
            _ => match variables.get(&name) {
                Some(value) => Token::Text(value.clone()),
                None => Token::Text(format!("{{{}}}", token)),
            },
        }
    }

    fn read_clipboard(&self) -> String {
        match self.clipboard.lock().try_to_get_content_from_clipboard() {
            Ok(text) => text,
            Err(e) => {
                crate::debug!("Clipboard unavailable for template: {}", e);
                String::new()
            }
        }
    }
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new()
    }
}

enum Token {
    Text(String),
    Cursor,
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
