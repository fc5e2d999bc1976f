// Trigger matcher - finds the rule whose trigger ends the buffer
// Longest trigger wins; equal lengths fall back to the lexicographically smallest trigger

use crate::config::{Rule, RuleSnapshot};

/// The rule selected for a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub trigger: String,
    pub rule: Rule,
}

/// Find the best matching rule for the buffer contents.
///
/// A rule is a candidate when the buffer ends with its trigger: exactly for
/// case-sensitive rules, after lowercasing both sides otherwise. Lengths are
/// counted in characters so multi-byte triggers compare correctly.
pub fn find_match(buffer_text: &str, snapshot: &RuleSnapshot) -> Option<MatchResult> {
    if buffer_text.is_empty() || snapshot.is_empty() {
        return None;
    }

    let buffer: Vec<char> = buffer_text.chars().collect();
    let mut best: Option<(&Rule, usize)> = None;

    for rule in snapshot.rules() {
        let trigger_len = rule.trigger.chars().count();
        if trigger_len == 0 || trigger_len > buffer.len() {
            continue;
        }

        let tail: String = buffer[buffer.len() - trigger_len..].iter().collect();
        if !trigger_matches(&tail, rule) {
            continue;
        }

        let better = match best {
            None => true,
            Some((current, current_len)) => {
                trigger_len > current_len
                    || (trigger_len == current_len && rule.trigger < current.trigger)
            }
        };
        if better {
            best = Some((rule, trigger_len));
        }
    }

    best.map(|(rule, _)| MatchResult {
        trigger: rule.trigger.clone(),
        rule: rule.clone(),
    })
}

fn trigger_matches(tail: &str, rule: &Rule) -> bool {
    if rule.case_sensitive {
        tail == rule.trigger
    } else {
        tail.to_lowercase() == rule.trigger.to_lowercase()
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
