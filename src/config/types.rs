// Persisted configuration types - the on-disk JSON shape

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single trigger/replacement pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    /// Text typed by the user (e.g. ";email")
    pub trigger: String,
    /// Replacement template, may contain {VARIABLE} tokens
    pub replacement: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Rule {
    /// Case-insensitive rule with no category or description
    pub fn new(trigger: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            replacement: replacement.into(),
            case_sensitive: false,
            category: None,
            description: None,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Global behaviour flags, read fresh for every boundary key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    pub trigger_on_space: bool,
    pub trigger_on_tab: bool,
    pub trigger_on_enter: bool,
    /// Kept for the tray/notification front-end; the engine ignores it
    pub show_notifications: bool,
    pub log_expansions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_on_space: true,
            trigger_on_tab: true,
            trigger_on_enter: true,
            show_notifications: false,
            log_expansions: true,
        }
    }
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedConfig {
    #[serde(default)]
    pub expansions: Vec<Rule>,
    #[serde(default)]
    pub custom_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: Settings,
}

impl PersistedConfig {
    /// Configuration written on first run
    pub fn with_defaults() -> Self {
        let expansions = vec![
            Rule::new(";email", "your.email@example.com").with_description("Personal email"),
            Rule::new(";date", "{DATE}").with_description("Current date"),
            Rule::new(";sig", "Best regards,\nYour Name").with_description("Email signature"),
            Rule::new(";shrug", "¯\\_(ツ)_/¯").with_description("Shrug emoji"),
        ];

        let mut custom_variables = BTreeMap::new();
        custom_variables.insert("NAME".to_string(), "John Doe".to_string());
        custom_variables.insert("COMPANY".to_string(), "Acme Corp".to_string());

        Self {
            expansions,
            custom_variables,
            settings: Settings::default(),
        }
    }
}
