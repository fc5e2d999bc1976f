// Global key listener backed by rdev
//
// rdev::listen blocks its thread for the life of the process and cannot be
// unhooked, so stopping only disarms the callback.

use parking_lot::Mutex;
use rdev::{listen, Event};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{translate_event, CaptureError};
use crate::expander::LogicalKey;

/// Listens for key presses system-wide and forwards logical keys
pub struct KeyListener {
    /// Whether events are forwarded
    armed: Arc<AtomicBool>,
    /// Handle to the listener thread, set once
    listener_handle: Mutex<Option<JoinHandle<()>>>,
}

impl KeyListener {
    pub fn new() -> Self {
        Self {
            armed: Arc::new(AtomicBool::new(false)),
            listener_handle: Mutex::new(None),
        }
    }

    /// Start forwarding key presses to `on_key`.
    ///
    /// The OS hook is installed on the first call. Later calls only re-arm it;
    /// the first callback stays installed.
    pub fn start<F>(&self, on_key: F) -> Result<(), CaptureError>
    where
        F: Fn(LogicalKey) + Send + 'static,
    {
        let mut handle_guard = self.listener_handle.lock();
        if handle_guard.is_some() {
            crate::debug!("Key listener already installed, re-arming");
            self.armed.store(true, Ordering::SeqCst);
            return Ok(());
        }

        let armed = self.armed.clone();
        armed.store(true, Ordering::SeqCst);

        let handle = thread::Builder::new()
            .name("key-listener".to_string())
            .spawn(move || {
                let callback_armed = armed.clone();
                let callback = move |event: Event| {
                    if !callback_armed.load(Ordering::SeqCst) {
                        return;
                    }
                    if let Some(key) = translate_event(&event.event_type, event.name.as_deref()) {
                        on_key(key);
                    }
                };

                // rdev::listen blocks until an error occurs
                if let Err(e) = listen(callback) {
                    crate::error!("Key listener error: {:?}", e);
                }

                armed.store(false, Ordering::SeqCst);
            })
            .map_err(|e| CaptureError::SpawnFailed(e.to_string()))?;

        *handle_guard = Some(handle);
        crate::info!("Key listener started");
        Ok(())
    }

    /// Stop forwarding events. The hook thread stays parked in rdev.
    pub fn stop(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            crate::info!("Key listener stopped");
        }
    }

    /// Whether events are currently being forwarded
    pub fn is_running(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl Default for KeyListener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "listener_test.rs"]
mod tests;
