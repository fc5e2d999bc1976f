// Configuration module - persisted expansion rules, variables and settings,
// plus the immutable snapshot the engine reads on every key

mod snapshot;
mod store;
mod types;
mod watcher;

pub use snapshot::{build_snapshot, RuleSnapshot, SnapshotCell};
pub use store::{ConfigStore, FileRuleSource, RuleSource};
pub use types::{PersistedConfig, Rule, Settings};
pub use watcher::ConfigWatcher;

use std::path::PathBuf;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "TEXT_EXPANDER_CONFIG";

const APP_DIR_NAME: &str = "text-expander";
const CONFIG_FILE_NAME: &str = "expansions.json";

/// Errors that can occur while loading, saving or watching the configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file
    #[error("Failed to load config: {0}")]
    LoadError(String),
    /// Failed to write the config file
    #[error("Failed to persist config: {0}")]
    PersistenceError(String),
    /// Rule failed validation
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
    /// Variable failed validation
    #[error("Invalid variable: {0}")]
    InvalidVariable(String),
    /// A rule with this trigger already exists
    #[error("Trigger {0} already exists")]
    DuplicateTrigger(String),
    /// No rule or variable with this key
    #[error("{0} not found")]
    NotFound(String),
    /// File watcher could not be started
    #[error("Failed to watch config: {0}")]
    WatchError(String),
}

/// Location of the config file: `$TEXT_EXPANDER_CONFIG` when set, otherwise
/// `<config dir>/text-expander/expansions.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    app_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Per-user application directory, also used for the usage and app logs
pub fn app_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::LoadError("Could not determine config directory".to_string()))
}
