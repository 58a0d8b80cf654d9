//! At-most-once hand-off between the async fetch and the UI completion pass

use parking_lot::Mutex;
use tracing::debug;

/// A fetched suggestion set waiting for the UI completion pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompletion {
    /// Suggestion texts, never blank when stored by the session
    pub predictions: Vec<String>,
    /// Character offset at which the suggestions apply
    pub offset: usize,
    /// Token correlating the later verify report to this suggestion set
    pub verify_token: String,
}

/// Session-scoped single-slot completion cache
///
/// `store` overwrites any unconsumed entry; stale, never-shown suggestions are
/// simply dropped. `take` returns the entry and clears the slot atomically, so
/// a suggestion set is surfaced to the UI at most once.
#[derive(Debug, Default)]
pub struct CompletionCache {
    slot: Mutex<Option<PendingCompletion>>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh entry, silently replacing any unconsumed one
    pub fn store(&self, entry: PendingCompletion) {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            debug!("dropping unconsumed completion entry");
        }
        *slot = Some(entry);
    }

    /// Take the current entry, leaving the cache empty
    pub fn take(&self) -> Option<PendingCompletion> {
        self.slot.lock().take()
    }
}
