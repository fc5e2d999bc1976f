// Shutdown coordination module
// Provides a global flag to prevent operations during app shutdown

use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag - set to true when app is shutting down
static APP_SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Signal that the app is shutting down
/// Called from the Ctrl+C handler; the main loop then stops the engine
pub fn signal_shutdown() {
    APP_SHUTTING_DOWN.store(true, Ordering::SeqCst);
    crate::info!("App shutdown signaled");
}

/// Check if the app is shutting down
/// Returns true after signal_shutdown() has been called
pub fn is_shutting_down() -> bool {
    APP_SHUTTING_DOWN.load(Ordering::SeqCst)
}

#[cfg(test)]
pub(crate) fn reset_for_tests() {
    APP_SHUTTING_DOWN.store(false, Ordering::SeqCst);
}

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod tests;
