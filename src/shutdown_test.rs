use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_shutdown_flag_transitions() {
    reset_for_tests();

    // Initially not shutting down
    assert!(!is_shutting_down());

    // After signal, should be shutting down
    signal_shutdown();
    assert!(is_shutting_down());

    // Should remain true
    assert!(is_shutting_down());

    reset_for_tests();
}

#[test]
#[serial]
fn test_reset_clears_flag() {
    signal_shutdown();
    reset_for_tests();
    assert!(!is_shutting_down());
}
