// Expansion engine - rolling buffer, trigger matching, template rendering and
// the controller that drives them from key events

mod buffer;
mod controller;
mod keys;
mod matcher;
mod template;

pub use buffer::{RollingBuffer, DEFAULT_BUFFER_CAPACITY};
pub use controller::{EngineStatus, ExpansionController, ExpansionThreadHandle, KeyOutcome, KeySender};
pub use keys::LogicalKey;
pub use matcher::{find_match, MatchResult};
pub use template::{RenderResult, TemplateProcessor};
