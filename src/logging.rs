// Logging setup - terminal plus a file in the app log directory

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::AppError;

/// File name of the application log inside the log directory
pub const APP_LOG_FILE: &str = "text-expander.log";

/// Debug in debug builds, Info in release
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger writing to the terminal and `<log_dir>/text-expander.log`
pub fn init_logging(log_dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(log_dir).map_err(|e| AppError::Logging(e.to_string()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(APP_LOG_FILE))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    let mut builder = ConfigBuilder::new();
    // Falls back to UTC when the local offset cannot be determined
    let _ = builder.set_time_offset_to_local();
    let config = builder.build();

    let level = default_level();
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, config, file),
    ];

    CombinedLogger::init(loggers).map_err(|e| AppError::Logging(e.to_string()))
}
