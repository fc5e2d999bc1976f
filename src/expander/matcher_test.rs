use super::*;
use crate::config::{build_snapshot, Settings};
use std::collections::BTreeMap;

fn snapshot_of(rules: Vec<Rule>) -> RuleSnapshot {
    build_snapshot(&rules, &BTreeMap::new(), Settings::default())
}

#[test]
fn test_prefers_longest_trigger() {
    let snapshot = snapshot_of(vec![Rule::new(";e", "short"), Rule::new(";email", "long")]);

    let result = find_match("test;email", &snapshot).expect("should match");
    assert_eq!(result.trigger, ";email");
    assert_eq!(result.rule.replacement, "long");

    let result = find_match("test;e", &snapshot).expect("should match");
    assert_eq!(result.trigger, ";e");
}

#[test]
fn test_case_insensitive_rule_matches_any_case() {
    let snapshot = snapshot_of(vec![Rule::new(";date", "{DATE}")]);

    let result = find_match("Today is ;DATE", &snapshot).expect("should match");
    assert_eq!(result.trigger, ";date");
    assert!(find_match("Today is ;DaTe", &snapshot).is_some());
}

#[test]
fn test_case_sensitive_rule_requires_exact_case() {
    let snapshot = snapshot_of(vec![Rule::new("BTW", "by the way").case_sensitive(true)]);

    assert!(find_match("so BTW", &snapshot).is_some());
    assert!(find_match("so btw", &snapshot).is_none());
}

#[test]
fn test_trigger_must_end_the_buffer() {
    let snapshot = snapshot_of(vec![Rule::new(";sig", "signature")]);

    assert!(find_match(";sig more", &snapshot).is_none());
    assert!(find_match(";si", &snapshot).is_none());
}

#[test]
fn test_trigger_longer_than_buffer_is_skipped() {
    let snapshot = snapshot_of(vec![Rule::new(";longtrigger", "x")]);
    assert!(find_match("trigger", &snapshot).is_none());
}

#[test]
fn test_empty_buffer_or_rules_never_match() {
    let snapshot = snapshot_of(vec![Rule::new(";a", "x")]);
    assert!(find_match("", &snapshot).is_none());
    assert!(find_match(";a", &RuleSnapshot::empty()).is_none());
}

#[test]
fn test_equal_length_tie_breaks_lexicographically() {
    // Both triggers end the buffer case-insensitively and have equal length
    let snapshot = snapshot_of(vec![
        Rule::new("xab", "lower-case"),
        Rule::new("XAB", "upper-case"),
    ]);

    for _ in 0..10 {
        let result = find_match("...xab", &snapshot).expect("should match");
        assert_eq!(result.trigger, "XAB", "'X' sorts before 'x'");
    }
}

#[test]
fn test_lengths_counted_in_characters() {
    // "éé" is 2 chars but 4 bytes
    let snapshot = snapshot_of(vec![Rule::new("éé", "accent"), Rule::new("zéé", "longer")]);

    let result = find_match("azéé", &snapshot).expect("should match");
    assert_eq!(result.trigger, "zéé");

    let buffer_of_two = "éé";
    assert_eq!(
        find_match(buffer_of_two, &snapshot).map(|m| m.trigger),
        Some("éé".to_string())
    );
}

#[test]
fn test_unicode_case_folding() {
    let snapshot = snapshot_of(vec![Rule::new(";straße", "street")]);
    assert!(find_match("go ;STRAßE", &snapshot).is_some());
}
