// Config file watcher - calls back when the expansions file changes on disk

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::ConfigError;

/// Watches the directory containing the config file.
///
/// Editors often replace a file instead of writing it in place, so the parent
/// directory is watched and events are filtered by file name. Dropping the
/// watcher stops delivery.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching `path`, invoking `on_change` for every create, modify
    /// or rename event that touches it.
    pub fn start<F>(path: &Path, on_change: F) -> Result<Self, ConfigError>
    where
        F: Fn() + Send + 'static,
    {
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| ConfigError::WatchError(format!("not a file path: {:?}", path)))?
            .to_os_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_relevant(&event, &file_name) {
                    crate::debug!("Config file changed: {:?}", event.kind);
                    on_change();
                }
            }
            Err(e) => crate::warn!("Config watch error: {}", e),
        })
        .map_err(|e| ConfigError::WatchError(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(e.to_string()))?;

        crate::info!("Watching {:?} for config changes", path);
        Ok(Self {
            _watcher: watcher,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    let kind_matches = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    kind_matches
        && event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n == file_name.as_os_str()).unwrap_or(false))
}
