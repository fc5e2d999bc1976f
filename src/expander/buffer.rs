// Rolling input buffer - the most recent characters typed by the user
// Mirrors what is in the focused document so triggers can be matched as suffixes

use parking_lot::Mutex;

/// Default number of characters retained by the buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 50;

/// Fixed-capacity character buffer with FIFO eviction.
///
/// All access goes through a single mutex so the event-processing path and
/// status readers can share it. When full, appending shifts everything left
/// by one and drops the oldest character.
#[derive(Debug)]
pub struct RollingBuffer {
    data: Mutex<Vec<char>>,
    capacity: usize,
}

impl RollingBuffer {
    /// Create a buffer holding at most `capacity` characters.
    /// A capacity of zero falls back to [`DEFAULT_BUFFER_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_BUFFER_CAPACITY
        } else {
            capacity
        };
        Self {
            data: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append one character, evicting the oldest if at capacity
    pub fn append(&self, ch: char) {
        let mut data = self.data.lock();
        push_bounded(&mut data, self.capacity, ch);
    }

    /// Remove the most recently appended character; no-op when empty
    pub fn remove_last(&self) {
        self.data.lock().pop();
    }

    /// Empty the buffer
    pub fn clear(&self) {
        let mut data = self.data.lock();
        if !data.is_empty() {
            crate::trace!("[buffer] Buffer cleared, was holding {} chars", data.len());
        }
        data.clear();
    }

    /// Snapshot of the current contents, oldest first
    pub fn contents(&self) -> String {
        self.data.lock().iter().collect()
    }

    /// True iff the trailing characters equal `trigger` exactly.
    ///
    /// Returns false for an empty trigger or one longer than the buffer.
    /// Case folding is the caller's concern.
    pub fn ends_with(&self, trigger: &str) -> bool {
        if trigger.is_empty() {
            return false;
        }

        let data = self.data.lock();
        let wanted: Vec<char> = trigger.chars().collect();
        if wanted.len() > data.len() {
            return false;
        }

        data[data.len() - wanted.len()..] == wanted[..]
    }

    /// Drop `remove` trailing characters and append `text`, in one lock scope.
    ///
    /// Used after an expansion so the buffer reflects the trigger having been
    /// deleted and the rendered text typed in its place.
    pub fn replace_suffix(&self, remove: usize, text: &str) {
        let mut data = self.data.lock();
        let keep = data.len().saturating_sub(remove);
        data.truncate(keep);
        for ch in text.chars() {
            push_bounded(&mut data, self.capacity, ch);
        }
    }

    /// Number of characters currently held
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

fn push_bounded(data: &mut Vec<char>, capacity: usize, ch: char) {
    if data.len() >= capacity {
        data.remove(0);
    }
    data.push(ch);
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod tests;
