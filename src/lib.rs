// Live text expander: watches typing system-wide and replaces triggers with
// their configured expansions.

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod capture;
pub mod clipboard;
pub mod config;
pub mod expander;
pub mod guard;
pub mod keyboard;
pub mod logging;
pub mod shutdown;
pub mod usage;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use capture::{CaptureError, KeyListener};
use config::{ConfigError, ConfigStore, ConfigWatcher, FileRuleSource, RuleSnapshot, SnapshotCell};
use expander::{ExpansionController, ExpansionThreadHandle};
use guard::RateLimiter;
use keyboard::{KeyboardSimulator, SinkError};
use usage::UsageLog;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

/// How often the main thread checks for a shutdown request
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// File name of the expansion usage log inside the log directory
const USAGE_LOG_FILE: &str = "expansions.log";

/// Errors that stop the application from starting
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
    #[error("Failed to open usage log: {0}")]
    UsageLog(#[from] std::io::Error),
    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(String),
}

/// Application entry point - runs the engine until Ctrl+C.
/// Note: This function cannot be unit tested as it hooks the real keyboard.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn run() -> Result<(), AppError> {
    let app_dir = config::app_dir()?;
    let log_dir = app_dir.join("logs");
    logging::init_logging(&log_dir)?;
    info!("Setting up text-expander...");

    let mut store = ConfigStore::with_default_path()?;
    let initial = store.load_or_default()?.clone();
    let config_path = store.config_path().to_path_buf();
    let snapshot = Arc::new(SnapshotCell::new(RuleSnapshot::from(&initial)));

    let sink = KeyboardSimulator::new()?;
    let usage = Arc::new(UsageLog::open(log_dir.join(USAGE_LOG_FILE))?);

    let controller = Arc::new(
        ExpansionController::new(snapshot, Box::new(sink))
            .with_guard(Arc::new(RateLimiter::default()))
            .with_logger(usage.clone()),
    );
    controller.start();

    let worker = ExpansionThreadHandle::spawn(controller.clone());

    // Hot reload; the engine keeps running on the startup rules if this fails
    let reload_controller = controller.clone();
    let source = FileRuleSource::new(config_path.clone());
    let _watcher = match ConfigWatcher::start(&config_path, move || {
        if let Ok(count) = reload_controller.reload(&source) {
            info!("Reloaded {} expansions", count);
        }
    }) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Config hot reload disabled: {}", e);
            None
        }
    };

    let listener = KeyListener::new();
    let hook_controller = controller.clone();
    let sender = worker.key_sender();
    listener.start(move |key| {
        // Synthetic keystrokes from an expansion in flight are dropped here
        if hook_controller.accepts_input() && !sender.submit(key) {
            warn!("Expansion worker is gone, dropping key event");
        }
    })?;

    ctrlc::set_handler(shutdown::signal_shutdown).map_err(|e| AppError::Signal(e.to_string()))?;
    info!(
        "text-expander running with {} expansions from {:?}",
        controller.status().rule_count,
        config_path
    );

    while !shutdown::is_shutting_down() {
        thread::sleep(SHUTDOWN_POLL_INTERVAL);
    }

    listener.stop();
    controller.stop();
    worker.shutdown();

    let stats = usage.statistics();
    info!(
        "Shut down after {} expansions ({} today)",
        stats.total_expansions, stats.today_expansions
    );
    Ok(())
}
