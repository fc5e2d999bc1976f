use super::*;
use crate::clipboard::test_fixtures::StaticClipboard;
use chrono::NaiveDate;

fn processor() -> TemplateProcessor {
    TemplateProcessor::with_clipboard(Box::new(StaticClipboard::with_text("from clipboard")))
}

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(7, 5, 3)
        .unwrap()
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_date_keeps_surrounding_text() {
    let result = processor().render("Today is {DATE}.", &HashMap::new());

    assert!(result.text.starts_with("Today is "));
    assert!(result.text.ends_with('.'));
    assert_eq!(result.cursor_offset, 0);
}

#[test]
fn test_date_time_formats() {
    let p = processor();
    let empty = HashMap::new();

    assert_eq!(p.render_at("{DATE}", &empty, fixed_now()).text, "2024-03-09");
    assert_eq!(p.render_at("{TIME}", &empty, fixed_now()).text, "07:05:03");
    assert_eq!(
        p.render_at("{DATETIME}", &empty, fixed_now()).text,
        "2024-03-09 07:05:03"
    );
}

#[test]
fn test_builtin_tokens_are_case_insensitive() {
    let result = processor().render_at("{date}/{Time}", &HashMap::new(), fixed_now());
    assert_eq!(result.text, "2024-03-09/07:05:03");
}

#[test]
fn test_cursor_offset_from_end() {
    let result = processor().render("Hello{CURSOR}World", &HashMap::new());

    assert_eq!(result.text, "HelloWorld");
    assert_eq!(result.cursor_offset, 5);
}

#[test]
fn test_cursor_at_end_and_start() {
    let p = processor();
    assert_eq!(p.render("abc{CURSOR}", &HashMap::new()).cursor_offset, 0);

    let result = p.render("{CURSOR}abc", &HashMap::new());
    assert_eq!(result.text, "abc");
    assert_eq!(result.cursor_offset, 3);
}

#[test]
fn test_multiple_cursors_last_wins() {
    let result = processor().render("a{CURSOR}bc{cursor}def", &HashMap::new());

    assert_eq!(result.text, "abcdef");
    assert_eq!(result.cursor_offset, 3);
}

#[test]
fn test_cursor_offset_counts_characters_not_bytes() {
    let result = processor().render("<{CURSOR}ñü>", &HashMap::new());
    assert_eq!(result.cursor_offset, 3);
}

#[test]
fn test_custom_variable_substitution() {
    let result = processor().render("Hi {NAME}", &vars(&[("NAME", "Alice")]));
    assert_eq!(result.text, "Hi Alice");
}

#[test]
fn test_custom_variable_lookup_uppercases_token() {
    let result = processor().render("Hi {name} at {Company}", &vars(&[("NAME", "Alice"), ("COMPANY", "Acme")]));
    assert_eq!(result.text, "Hi Alice at Acme");
}

#[test]
fn test_unknown_token_is_emitted_verbatim() {
    let result = processor().render("Value: {unknown} end", &HashMap::new());
    assert_eq!(result.text, "Value: {unknown} end");
}

#[test]
fn test_unclosed_brace_is_literal() {
    let result = processor().render("a {b c", &HashMap::new());
    assert_eq!(result.text, "a {b c");

    let result = processor().render("trailing {", &HashMap::new());
    assert_eq!(result.text, "trailing {");
}

#[test]
fn test_token_runs_to_first_closing_brace() {
    let result = processor().render("{a{b}c}", &HashMap::new());
    assert_eq!(result.text, "{a{b}c}");

    let result = processor().render("{{NAME}}", &vars(&[("NAME", "x")]));
    assert_eq!(result.text, "{{NAME}}");
}

#[test]
fn test_empty_braces_kept() {
    let result = processor().render("{}", &HashMap::new());
    assert_eq!(result.text, "{}");
}

#[test]
fn test_clipboard_substitution() {
    let result = processor().render("[{CLIPBOARD}]", &HashMap::new());
    assert_eq!(result.text, "[from clipboard]");
}

#[test]
fn test_clipboard_failure_substitutes_empty() {
    let p = TemplateProcessor::with_clipboard(Box::new(StaticClipboard::failing()));
    let result = p.render("[{CLIPBOARD}]", &HashMap::new());
    assert_eq!(result.text, "[]");
}

#[test]
fn test_empty_template() {
    let result = processor().render("", &HashMap::new());
    assert_eq!(result, RenderResult::default());
}

#[test]
fn test_builtins_shadow_custom_variables() {
    let result = processor().render_at("{DATE}", &vars(&[("DATE", "custom")]), fixed_now());
    assert_eq!(result.text, "2024-03-09");
}
