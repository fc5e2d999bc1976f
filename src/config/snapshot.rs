// Immutable rule snapshot and the cell that publishes it
//
// A snapshot is built once per load and never mutated afterwards. Reloads build
// a fresh snapshot and swap the Arc under the cell's lock, so a reader holding
// the previous Arc keeps a fully consistent view of rules, variables and settings.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::types::{PersistedConfig, Rule, Settings};

/// Rules, custom variables and settings as one immutable value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSnapshot {
    /// Rules keyed by trigger
    rules: BTreeMap<String, Rule>,
    /// Custom variables keyed by upper-cased name
    variables: HashMap<String, String>,
    settings: Settings,
}

impl RuleSnapshot {
    /// Snapshot with no rules or variables and default settings
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn rule(&self, trigger: &str) -> Option<&Rule> {
        self.rules.get(trigger)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Custom variables keyed by upper-cased name
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }
}

/// Build a snapshot from persisted entries.
///
/// Later entries win on duplicate triggers. Rules with a blank trigger are
/// dropped. Variable names are upper-cased; later names win on collision.
pub fn build_snapshot<'a, R, V>(rules: R, variables: V, settings: Settings) -> RuleSnapshot
where
    R: IntoIterator<Item = &'a Rule>,
    V: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut rule_map = BTreeMap::new();
    for rule in rules {
        if rule.trigger.is_empty() {
            crate::warn!("Skipping rule with empty trigger");
            continue;
        }
        if rule_map.insert(rule.trigger.clone(), rule.clone()).is_some() {
            crate::debug!("Duplicate trigger '{}', keeping the later rule", rule.trigger);
        }
    }

    let variables = variables
        .into_iter()
        .map(|(name, value)| (name.to_uppercase(), value.clone()))
        .collect();

    RuleSnapshot {
        rules: rule_map,
        variables,
        settings,
    }
}

impl From<&PersistedConfig> for RuleSnapshot {
    fn from(config: &PersistedConfig) -> Self {
        build_snapshot(
            &config.expansions,
            &config.custom_variables,
            config.settings,
        )
    }
}

/// Shared, swappable reference to the active snapshot
#[derive(Debug)]
pub struct SnapshotCell {
    current: RwLock<Arc<RuleSnapshot>>,
}

impl SnapshotCell {
    pub fn new(snapshot: RuleSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot active right now. Callers keep it for the whole operation.
    pub fn current(&self) -> Arc<RuleSnapshot> {
        self.current.read().clone()
    }

    /// Publish a new snapshot, returning the one it replaced
    pub fn install(&self, snapshot: RuleSnapshot) -> Arc<RuleSnapshot> {
        let next = Arc::new(snapshot);
        std::mem::replace(&mut *self.current.write(), next)
    }
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::new(RuleSnapshot::empty())
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
