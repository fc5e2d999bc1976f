// Usage log - records which triggers fired, never the expanded text
//
// Lines are appended as "<RFC3339>\ttrigger=<trigger>" and the file is rotated
// to "<path>.<unix-ts>" once it grows past MAX_LOG_SIZE.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Rotate the usage log once it reaches 5 MiB
pub const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Receives one call per successful expansion
pub trait ExpansionLogger: Send + Sync {
    fn log_expansion(&self, trigger: &str);

    /// Record a non-fatal engine error (e.g. a failed reload)
    fn log_error(&self, _message: &str) {}
}

/// Summary of expansion usage since the log was opened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total_expansions: u64,
    pub today_expansions: u64,
    pub most_used_trigger: Option<String>,
    pub last_expansion: Option<DateTime<Local>>,
}

struct UsageState {
    file: Option<File>,
    stats: Statistics,
    counts: HashMap<String, u64>,
}

/// File-backed usage log with in-memory statistics
pub struct UsageLog {
    path: PathBuf,
    max_size: u64,
    state: Mutex<UsageState>,
}

impl UsageLog {
    /// Open (or create) the log file at `path`
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        Self::open_with_max_size(path, MAX_LOG_SIZE)
    }

    pub fn open_with_max_size(path: impl Into<PathBuf>, max_size: u64) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = open_append(&path)?;

        Ok(Self {
            path,
            max_size,
            state: Mutex::new(UsageState {
                file: Some(file),
                stats: Statistics::default(),
                counts: HashMap::new(),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current statistics
    pub fn statistics(&self) -> Statistics {
        self.state.lock().stats.clone()
    }

    fn record_at(&self, trigger: &str, now: DateTime<Local>) {
        let mut state = self.state.lock();

        let same_day = state
            .stats
            .last_expansion
            .map(|last| last.date_naive() == now.date_naive())
            .unwrap_or(false);
        if !same_day {
            state.stats.today_expansions = 0;
        }
        state.stats.total_expansions += 1;
        state.stats.today_expansions += 1;
        state.stats.last_expansion = Some(now);

        let count = {
            let entry = state.counts.entry(trigger.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        let current_best = state
            .stats
            .most_used_trigger
            .as_ref()
            .and_then(|t| state.counts.get(t).copied())
            .unwrap_or(0);
        if state.stats.most_used_trigger.is_none() || count > current_best {
            state.stats.most_used_trigger = Some(trigger.to_string());
        }

        let line = format!("{}\ttrigger={}\n", now.to_rfc3339(), trigger);
        self.write_line(&mut state, &line);
    }

    fn write_line(&self, state: &mut UsageState, line: &str) {
        self.rotate_if_needed(state);
        if let Some(file) = state.file.as_mut() {
            if let Err(e) = file.write_all(line.as_bytes()) {
                crate::warn!("Failed to write usage log {:?}: {}", self.path, e);
            }
        }
    }

    fn rotate_if_needed(&self, state: &mut UsageState) {
        let size = match state.file.as_ref().map(|f| f.metadata()) {
            Some(Ok(meta)) => meta.len(),
            _ => return,
        };
        if size < self.max_size {
            return;
        }

        // Close before renaming
        state.file = None;
        let backup = PathBuf::from(format!(
            "{}.{}",
            self.path.display(),
            Local::now().timestamp()
        ));
        if let Err(e) = fs::rename(&self.path, &backup) {
            crate::warn!("Failed to rotate usage log: {}", e);
        }

        state.file = match open_append(&self.path) {
            Ok(file) => Some(file),
            Err(e) => {
                crate::warn!("Failed to reopen usage log {:?}: {}", self.path, e);
                None
            }
        };
    }
}

impl ExpansionLogger for UsageLog {
    fn log_expansion(&self, trigger: &str) {
        self.record_at(trigger, Local::now());
    }

    fn log_error(&self, message: &str) {
        let mut state = self.state.lock();
        let line = format!("{}\tERROR: {}\n", Local::now().to_rfc3339(), message);
        self.write_line(&mut state, &line);
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
#[path = "usage_test.rs"]
mod tests;
