// Expansion controller - turns logical key events into text expansions
//
// The controller owns the rolling buffer and reads the active rule snapshot on
// every boundary key. While an expansion is being typed it is Suppressed and
// drops incoming events, so the sink's synthetic keystrokes never re-enter it.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::buffer::{RollingBuffer, DEFAULT_BUFFER_CAPACITY};
use super::keys::LogicalKey;
use super::matcher::{find_match, MatchResult};
use super::template::{RenderResult, TemplateProcessor};
use crate::config::{ConfigError, RuleSnapshot, RuleSource, SnapshotCell};
use crate::guard::{AllowAll, ExpansionGuard};
use crate::keyboard::{OutputSink, SinkError};
use crate::usage::ExpansionLogger;

/// What happened to a single key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Dropped: the controller is stopped or an expansion is in flight
    Ignored,
    /// Buffer updated, nothing expanded
    Buffered,
    /// The trigger was replaced by its rendered text
    Expanded(String),
    /// A rule matched but the guard refused the expansion
    Vetoed(String),
    /// The sink failed part-way; the buffer was cleared
    Failed(String),
}

/// Point-in-time view of the controller for status readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    pub running: bool,
    pub suppressed: bool,
    pub buffer: String,
    pub rule_count: usize,
}

/// Text expansion state machine
pub struct ExpansionController {
    buffer: RollingBuffer,
    snapshot: Arc<SnapshotCell>,
    sink: Mutex<Box<dyn OutputSink>>,
    guard: Arc<dyn ExpansionGuard>,
    templates: TemplateProcessor,
    logger: Option<Arc<dyn ExpansionLogger>>,
    running: AtomicBool,
    suppressed: AtomicBool,
    /// Serializes key events; held for the whole of an expansion
    event_lock: Mutex<()>,
}

impl ExpansionController {
    /// Create a stopped controller reading rules from `snapshot` and writing to `sink`
    pub fn new(snapshot: Arc<SnapshotCell>, sink: Box<dyn OutputSink>) -> Self {
        Self {
            buffer: RollingBuffer::new(DEFAULT_BUFFER_CAPACITY),
            snapshot,
            sink: Mutex::new(sink),
            guard: Arc::new(AllowAll),
            templates: TemplateProcessor::new(),
            logger: None,
            running: AtomicBool::new(false),
            suppressed: AtomicBool::new(false),
            event_lock: Mutex::new(()),
        }
    }

    pub fn with_guard(mut self, guard: Arc<dyn ExpansionGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExpansionLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_templates(mut self, templates: TemplateProcessor) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer = RollingBuffer::new(capacity);
        self
    }

    /// Begin accepting key events. Returns false if already running.
    pub fn start(&self) -> bool {
        if self.running.swap(true, Ordering::SeqCst) {
            return false;
        }
        // Whatever was typed while stopped is unknown
        self.buffer.clear();
        crate::info!("Expansion engine started");
        true
    }

    /// Stop accepting key events. An expansion already in flight completes.
    /// Returns false if already stopped.
    pub fn stop(&self) -> bool {
        if !self.running.swap(false, Ordering::SeqCst) {
            return false;
        }
        crate::info!("Expansion engine stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst)
    }

    /// Whether a key event delivered now would be processed
    pub fn accepts_input(&self) -> bool {
        self.is_running() && !self.is_suppressed()
    }

    /// Process one logical key event to completion
    pub fn on_logical_key(&self, key: LogicalKey) -> KeyOutcome {
        if !self.accepts_input() {
            return KeyOutcome::Ignored;
        }
        let _event = self.event_lock.lock();
        // State may have changed while waiting for the previous event
        if !self.accepts_input() {
            return KeyOutcome::Ignored;
        }

        match key {
            LogicalKey::Character(ch) => {
                self.buffer.append(ch);
                KeyOutcome::Buffered
            }
            LogicalKey::Backspace => {
                self.buffer.remove_last();
                KeyOutcome::Buffered
            }
            LogicalKey::Space | LogicalKey::Tab | LogicalKey::Enter => {
                let snapshot = self.snapshot.current();
                let outcome = if key.triggers_expansion(&snapshot.settings()) {
                    self.try_expand(&snapshot)
                } else {
                    KeyOutcome::Buffered
                };
                if let Some(ch) = key.produced_char() {
                    self.buffer.append(ch);
                }
                outcome
            }
        }
    }

    fn try_expand(&self, snapshot: &RuleSnapshot) -> KeyOutcome {
        let found = match find_match(&self.buffer.contents(), snapshot) {
            Some(found) => found,
            None => return KeyOutcome::Buffered,
        };
        if found.trigger.is_empty() || found.rule.replacement.is_empty() {
            return KeyOutcome::Buffered;
        }

        self.suppressed.store(true, Ordering::SeqCst);
        let outcome = self.expand(&found, snapshot);
        self.suppressed.store(false, Ordering::SeqCst);
        outcome
    }

    fn expand(&self, found: &MatchResult, snapshot: &RuleSnapshot) -> KeyOutcome {
        if !self.guard.should_allow_expansion() {
            crate::debug!("Expansion of {} vetoed by guard", found.trigger);
            return KeyOutcome::Vetoed(found.trigger.clone());
        }

        let rendered = self.templates.render(&found.rule.replacement, snapshot.variables());
        if rendered.text.is_empty() {
            crate::debug!("Replacement for {} rendered empty, skipping", found.trigger);
            return KeyOutcome::Buffered;
        }

        let trigger_len = found.trigger.chars().count();
        if let Err(e) = self.emit(trigger_len, &rendered) {
            crate::error!("Expansion of {} failed: {}", found.trigger, e);
            self.buffer.clear();
            if let Some(logger) = &self.logger {
                logger.log_error(&format!("expansion of {} failed: {}", found.trigger, e));
            }
            return KeyOutcome::Failed(found.trigger.clone());
        }

        crate::debug!("Expanded {}", found.trigger);
        if snapshot.settings().log_expansions {
            if let Some(logger) = &self.logger {
                logger.log_expansion(&found.trigger);
            }
        }
        KeyOutcome::Expanded(found.trigger.clone())
    }

    /// Issue delete, type and cursor commands in order, keeping the buffer in step
    fn emit(&self, trigger_len: usize, rendered: &RenderResult) -> Result<(), SinkError> {
        let mut sink = self.sink.lock();
        sink.delete_backward(trigger_len)?;
        sink.type_text(&rendered.text)?;
        self.buffer.replace_suffix(trigger_len, &rendered.text);
        if rendered.cursor_offset > 0 {
            sink.move_cursor_left(rendered.cursor_offset)?;
        }
        Ok(())
    }

    /// Publish a new snapshot for subsequent events
    pub fn install_snapshot(&self, snapshot: RuleSnapshot) {
        let count = snapshot.rule_count();
        self.snapshot.install(snapshot);
        crate::info!("Installed rule snapshot with {} rules", count);
    }

    /// Re-read rules, variables and settings from `source`.
    ///
    /// On failure the previous snapshot stays installed and the error is
    /// reported to the log and the usage logger.
    pub fn reload(&self, source: &dyn RuleSource) -> Result<usize, ConfigError> {
        match source.load_config() {
            Ok(config) => {
                let snapshot = RuleSnapshot::from(&config);
                let count = snapshot.rule_count();
                self.install_snapshot(snapshot);
                Ok(count)
            }
            Err(e) => {
                crate::error!("Config reload failed, keeping previous rules: {}", e);
                if let Some(logger) = &self.logger {
                    logger.log_error(&format!("config reload failed: {}", e));
                }
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.snapshot.current()
    }

    pub fn buffer_contents(&self) -> String {
        self.buffer.contents()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            running: self.is_running(),
            suppressed: self.is_suppressed(),
            buffer: self.buffer.contents(),
            rule_count: self.snapshot.current().rule_count(),
        }
    }
}

/// Commands sent to the expansion worker thread
enum WorkerCommand {
    Key(LogicalKey),
    Shutdown,
}

/// Handle to the thread that feeds key events into the controller.
///
/// The OS hook thread only enqueues; synthetic typing happens on the worker.
/// When dropped, the worker is shut down and joined.
pub struct ExpansionThreadHandle {
    sender: Sender<WorkerCommand>,
    thread: Option<JoinHandle<()>>,
}

impl ExpansionThreadHandle {
    /// Spawn the worker for `controller`
    pub fn spawn(controller: Arc<ExpansionController>) -> Self {
        let (sender, receiver) = mpsc::channel();

        let thread = thread::spawn(move || {
            crate::debug!("Expansion worker started");
            while let Ok(command) = receiver.recv() {
                match command {
                    WorkerCommand::Key(key) => {
                        controller.on_logical_key(key);
                    }
                    WorkerCommand::Shutdown => break,
                }
            }
            crate::debug!("Expansion worker exiting");
        });

        Self {
            sender,
            thread: Some(thread),
        }
    }

    /// Queue a key event. Returns false if the worker has exited.
    pub fn submit(&self, key: LogicalKey) -> bool {
        self.sender.send(WorkerCommand::Key(key)).is_ok()
    }

    /// A cloneable sender for the key hook callback
    pub fn key_sender(&self) -> KeySender {
        KeySender {
            sender: self.sender.clone(),
        }
    }

    /// Stop the worker after the queued events are processed
    pub fn shutdown(mut self) {
        self.join();
    }

    fn join(&mut self) {
        // Ignore errors if thread already exited
        let _ = self.sender.send(WorkerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ExpansionThreadHandle {
    fn drop(&mut self) {
        self.join();
    }
}

/// Sending half of the worker queue, usable from other threads
#[derive(Clone)]
pub struct KeySender {
    sender: Sender<WorkerCommand>,
}

impl KeySender {
    pub fn submit(&self, key: LogicalKey) -> bool {
        self.sender.send(WorkerCommand::Key(key)).is_ok()
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
