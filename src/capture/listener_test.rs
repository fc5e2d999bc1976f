use super::*;

#[test]
fn test_new_listener_is_stopped() {
    let listener = KeyListener::new();
    assert!(!listener.is_running());

    // Stopping a listener that never started is a no-op
    listener.stop();
    assert!(!listener.is_running());
}

/// Installs the real OS hook.
///
/// Ignored by default because it requires a display session (and the
/// Accessibility permission on macOS). Run with: cargo test --ignored
#[test]
#[ignore] // Requires display and input permissions
fn test_listener_start_stop_integration() {
    let listener = KeyListener::new();
    listener.start(|_key| {}).expect("Failed to start listener");
    assert!(listener.is_running());

    listener.stop();
    assert!(!listener.is_running());

    // Re-arming reuses the installed hook
    listener.start(|_key| {}).expect("Failed to re-arm listener");
    assert!(listener.is_running());
}
