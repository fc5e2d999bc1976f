use super::*;
use std::sync::Arc;
use std::thread;

fn buffer_with(capacity: usize, text: &str) -> RollingBuffer {
    let buffer = RollingBuffer::new(capacity);
    for ch in text.chars() {
        buffer.append(ch);
    }
    buffer
}

#[test]
fn test_new_buffer_is_empty() {
    let buffer = RollingBuffer::new(10);
    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.capacity(), 10);
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_zero_capacity_uses_default() {
    let buffer = RollingBuffer::new(0);
    assert_eq!(buffer.capacity(), DEFAULT_BUFFER_CAPACITY);
}

#[test]
fn test_append_remove_and_clear() {
    let buffer = buffer_with(3, "abc");
    assert_eq!(buffer.contents(), "abc");

    buffer.append('d');
    assert_eq!(buffer.contents(), "bcd", "oldest char evicted on overflow");

    buffer.remove_last();
    assert_eq!(buffer.contents(), "bc");

    buffer.clear();
    assert_eq!(buffer.contents(), "");

    // Removing from an empty buffer is a no-op
    buffer.remove_last();
    assert!(buffer.is_empty());
}

#[test]
fn test_overflow_keeps_last_capacity_chars_in_order() {
    let input: String = "the quick brown fox jumps over the lazy dog".into();
    for capacity in [1usize, 5, 7, 20] {
        let buffer = buffer_with(capacity, &input);
        let expected: String = input
            .chars()
            .skip(input.chars().count() - capacity)
            .collect();
        assert_eq!(buffer.len(), capacity);
        assert_eq!(buffer.contents(), expected, "capacity {}", capacity);
    }
}

#[test]
fn test_ends_with_exact_suffix() {
    let buffer = buffer_with(50, "hello ;email");
    assert!(buffer.ends_with(";email"));
    assert!(buffer.ends_with("l"));
    assert!(buffer.ends_with("hello ;email"));
    assert!(!buffer.ends_with(";EMAIL"), "comparison is exact");
    assert!(!buffer.ends_with(";emai"));
}

#[test]
fn test_ends_with_empty_or_longer_trigger_is_false() {
    let buffer = buffer_with(50, "abc");
    assert!(!buffer.ends_with(""));
    assert!(!buffer.ends_with("xabc"));

    let empty = RollingBuffer::new(5);
    assert!(!empty.ends_with(""));
    assert!(!empty.ends_with("a"));
}

#[test]
fn test_ends_with_multibyte_chars() {
    let buffer = buffer_with(4, "xx;ünï");
    assert_eq!(buffer.contents(), ";ünï");
    assert!(buffer.ends_with("ünï"));
    assert!(buffer.ends_with(";ünï"));
}

#[test]
fn test_replace_suffix_reconciles_expansion() {
    let buffer = buffer_with(50, "mail ;sig");
    buffer.replace_suffix(4, "Best regards");
    assert_eq!(buffer.contents(), "mail Best regards");
}

#[test]
fn test_replace_suffix_respects_capacity() {
    let buffer = buffer_with(6, "ab;x");
    buffer.replace_suffix(2, "12345");
    assert_eq!(buffer.contents(), "b12345");
    assert_eq!(buffer.len(), 6);
}

#[test]
fn test_replace_suffix_removing_more_than_len_empties_first() {
    let buffer = buffer_with(10, "ab");
    buffer.replace_suffix(5, "z");
    assert_eq!(buffer.contents(), "z");
}

#[test]
fn test_concurrent_appends_never_exceed_capacity() {
    let buffer = Arc::new(RollingBuffer::new(16));
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    buffer.append(char::from(b'a' + n as u8));
                    let _ = buffer.contents();
                    if n == 3 {
                        buffer.remove_last();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(buffer.len() <= 16);
}
