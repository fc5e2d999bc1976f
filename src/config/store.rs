// Config store - persists and loads expansion rules, variables and settings
// JSON file on disk, written atomically through a temp file and rename

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::{PersistedConfig, Rule, Settings};
use super::ConfigError;

/// Anything the engine can reload its rules from
pub trait RuleSource: Send + Sync {
    /// Read the current persisted configuration
    fn load_config(&self) -> Result<PersistedConfig, ConfigError>;
}

/// Store for the configuration file with file-based persistence
#[derive(Debug)]
pub struct ConfigStore {
    config: PersistedConfig,
    /// Path to persistence file
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new store with the given config path
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config: PersistedConfig::default(),
            config_path,
        }
    }

    /// Create a store using the default config path
    pub fn with_default_path() -> Result<Self, ConfigError> {
        Ok(Self::new(super::default_config_path()?))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &PersistedConfig {
        &self.config
    }

    /// Load the configuration file.
    ///
    /// A missing file is created with the default configuration and an empty
    /// file loads defaults. A file that cannot be parsed is a `LoadError` and
    /// leaves the in-memory configuration untouched.
    pub fn load(&mut self) -> Result<&PersistedConfig, ConfigError> {
        crate::debug!("Loading config from {:?}", self.config_path);

        if !self.config_path.exists() {
            crate::info!("No config file found, writing defaults to {:?}", self.config_path);
            self.config = PersistedConfig::with_defaults();
            self.save()?;
            return Ok(&self.config);
        }

        let content = read_content(&self.config_path)?;
        self.config = if content.trim().is_empty() {
            PersistedConfig::with_defaults()
        } else {
            parse_config(&content)?
        };
        crate::info!("Loaded {} expansions", self.config.expansions.len());
        Ok(&self.config)
    }

    /// Load for startup: a corrupt file is backed up to `<path>.bak` and
    /// defaults are used so the engine can still run.
    pub fn load_or_default(&mut self) -> Result<&PersistedConfig, ConfigError> {
        match self.load().map(|_| ()) {
            Ok(_) => {}
            Err(ConfigError::LoadError(e)) if self.config_path.exists() => {
                crate::warn!("Config file is corrupt ({}), falling back to defaults", e);
                let backup = backup_path(&self.config_path);
                if let Err(copy_err) = fs::copy(&self.config_path, &backup) {
                    crate::warn!("Failed to back up corrupt config: {}", copy_err);
                }
                self.config = PersistedConfig::with_defaults();
            }
            Err(e) => return Err(e),
        }
        Ok(&self.config)
    }

    /// Persist the configuration using atomic write (temp file + rename)
    pub fn save(&self) -> Result<(), ConfigError> {
        crate::debug!(
            "Persisting {} expansions to {:?}",
            self.config.expansions.len(),
            self.config_path
        );

        // Ensure parent directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::PersistenceError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::PersistenceError(e.to_string()))?;

        // Use atomic temp file + rename pattern
        let temp_path = self.config_path.with_extension("tmp");

        // Write to temp file with explicit sync
        {
            let mut file = File::create(&temp_path).map_err(|e| {
                ConfigError::PersistenceError(format!("Failed to create temp file: {}", e))
            })?;
            file.write_all(content.as_bytes())
                .map_err(|e| ConfigError::PersistenceError(format!("Failed to write: {}", e)))?;
            file.sync_all()
                .map_err(|e| ConfigError::PersistenceError(format!("Failed to sync: {}", e)))?;
        } // File closed here

        // Atomic rename
        fs::rename(&temp_path, &self.config_path).map_err(|e| {
            // Clean up temp file on error
            let _ = fs::remove_file(&temp_path);
            ConfigError::PersistenceError(format!("Failed to rename: {}", e))
        })?;

        crate::debug!("Config persisted successfully");
        Ok(())
    }

    /// List all rules in file order
    pub fn rules(&self) -> &[Rule] {
        &self.config.expansions
    }

    /// Get a rule by trigger
    pub fn get(&self, trigger: &str) -> Option<&Rule> {
        self.config.expansions.iter().find(|r| r.trigger == trigger)
    }

    /// Add a new rule; the trigger must be non-blank and not already present
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), ConfigError> {
        validate_trigger(&rule.trigger)?;
        if self.get(&rule.trigger).is_some() {
            return Err(ConfigError::DuplicateTrigger(rule.trigger));
        }

        self.config.expansions.push(rule);
        self.save()
    }

    /// Replace the rule currently stored under `trigger`.
    /// The replacement may rename the trigger as long as it stays unique.
    pub fn update_rule(&mut self, trigger: &str, rule: Rule) -> Result<(), ConfigError> {
        validate_trigger(&rule.trigger)?;
        let index = self.index_of(trigger)?;
        if rule.trigger != trigger && self.get(&rule.trigger).is_some() {
            return Err(ConfigError::DuplicateTrigger(rule.trigger));
        }

        self.config.expansions[index] = rule;
        self.save()
    }

    /// Remove a rule by trigger
    pub fn remove_rule(&mut self, trigger: &str) -> Result<Rule, ConfigError> {
        let index = self.index_of(trigger)?;
        let removed = self.config.expansions.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Set a custom variable. Names are stored upper-cased.
    pub fn set_variable(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidVariable("name cannot be empty".to_string()));
        }
        self.config
            .custom_variables
            .insert(name.to_uppercase(), value.to_string());
        self.save()
    }

    /// Delete a custom variable (name matched case-insensitively)
    pub fn delete_variable(&mut self, name: &str) -> Result<(), ConfigError> {
        let wanted = name.trim().to_uppercase();
        let key = self
            .config
            .custom_variables
            .keys()
            .find(|k| k.to_uppercase() == wanted)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
        self.config.custom_variables.remove(&key);
        self.save()
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        self.config.settings = settings;
        self.save()
    }

    /// Toggle the global enabled flag
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.config.settings.enabled = enabled;
        self.save()
    }

    fn index_of(&self, trigger: &str) -> Result<usize, ConfigError> {
        self.config
            .expansions
            .iter()
            .position(|r| r.trigger == trigger)
            .ok_or_else(|| ConfigError::NotFound(trigger.to_string()))
    }
}

impl RuleSource for ConfigStore {
    /// Re-read the file from disk without touching this store's in-memory copy
    fn load_config(&self) -> Result<PersistedConfig, ConfigError> {
        read_config(&self.config_path)
    }
}

/// Reads the config file at a fixed path; used by the reload path
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RuleSource for FileRuleSource {
    fn load_config(&self) -> Result<PersistedConfig, ConfigError> {
        read_config(&self.path)
    }
}

/// Strict read used by reloads: a blank file is a `LoadError`, not defaults
fn read_config(path: &Path) -> Result<PersistedConfig, ConfigError> {
    let content = read_content(path)?;
    if content.trim().is_empty() {
        return Err(ConfigError::LoadError("config file is empty".to_string()));
    }
    parse_config(&content)
}

fn read_content(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::LoadError(e.to_string()))
}

fn parse_config(content: &str) -> Result<PersistedConfig, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))
}

fn validate_trigger(trigger: &str) -> Result<(), ConfigError> {
    if trigger.trim().is_empty() {
        return Err(ConfigError::InvalidRule("trigger cannot be empty".to_string()));
    }
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.bak", path.display()))
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
