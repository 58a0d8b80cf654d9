//! Buffer trait and in-memory reference implementation

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::edit::BufferEdit;

/// Callback invoked synchronously after every buffer edit
pub type ChangeListener = Box<dyn Fn(&BufferEdit) + Send + Sync>;

/// Scoped handle for a registered change listener
///
/// The listener stays registered until `unsubscribe` is called or the handle is
/// dropped, whichever happens first. Removal is idempotent.
pub struct ChangeSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ChangeSubscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the listener. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Read-only view of an editor document owned by the host IDE
///
/// Implementations must invoke registered listeners on the same thread that
/// applies the edit, after the text has been mutated.
pub trait EditorBuffer: Send + Sync {
    /// Full text snapshot
    fn text(&self) -> String;

    /// Current cursor position as a character offset
    fn cursor_offset(&self) -> usize;

    /// Language identifier of the document (e.g. "python", "rust")
    fn language_id(&self) -> String;

    /// Register a change listener; the returned handle removes it on release
    fn subscribe(&self, listener: ChangeListener) -> ChangeSubscription;
}

type ListenerRegistry = Mutex<Vec<(u64, Arc<dyn Fn(&BufferEdit) + Send + Sync>)>>;

/// In-memory [`EditorBuffer`] implementation
///
/// Serves as the reference implementation for embedding hosts that own their text
/// directly, and as the test double for the completion core.
pub struct SharedBuffer {
    text: RwLock<String>,
    cursor: AtomicUsize,
    language: String,
    listeners: Arc<ListenerRegistry>,
    next_listener_id: AtomicU64,
}

impl SharedBuffer {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            cursor: AtomicUsize::new(0),
            language: language.into(),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: AtomicU64::new(0),
        }
    }

    /// Move the cursor to a character offset
    pub fn set_cursor(&self, offset: usize) {
        self.cursor.store(offset, Ordering::SeqCst);
    }

    /// Replace `old_len` characters at `offset` with `replacement`
    ///
    /// Offsets are character offsets. Listeners are notified after the text has
    /// been mutated, outside the text lock.
    pub fn apply_edit(&self, offset: usize, old_len: usize, replacement: &str) {
        let new_len = replacement.chars().count();
        {
            let mut text = self.text.write();
            let start = char_to_byte(&text, offset);
            let end = char_to_byte(&text, offset + old_len);
            text.replace_range(start..end, replacement);
        }
        let edit = BufferEdit::new(offset, old_len, new_len);
        debug!(offset, old_len, new_len, "buffer edit applied");
        self.notify(&edit);
    }

    /// Number of registered listeners, for leak checks in tests
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn notify(&self, edit: &BufferEdit) {
        let snapshot: Vec<_> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(edit);
        }
    }
}

impl EditorBuffer for SharedBuffer {
    fn text(&self) -> String {
        self.text.read().clone()
    }

    fn cursor_offset(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn language_id(&self) -> String {
        self.language.clone()
    }

    fn subscribe(&self, listener: ChangeListener) -> ChangeSubscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push((id, Arc::from(listener)));
        let registry = Arc::clone(&self.listeners);
        ChangeSubscription::new(move || {
            registry.lock().retain(|(listener_id, _)| *listener_id != id);
        })
    }
}

/// Convert a character offset into a byte offset, clamping at end of text
fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn apply_edit_replaces_character_range() {
        let buffer = SharedBuffer::new("hello world", "text");
        buffer.apply_edit(6, 5, "there");
        assert_eq!(buffer.text(), "hello there");
    }

    #[test]
    fn apply_edit_insertion_and_deletion() {
        let buffer = SharedBuffer::new("abc", "text");
        buffer.apply_edit(1, 0, "xy");
        assert_eq!(buffer.text(), "axybc");
        buffer.apply_edit(1, 2, "");
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn listeners_observe_edit_events() {
        let buffer = SharedBuffer::new("abc", "text");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = buffer.subscribe(Box::new(move |edit| {
            sink.lock().push(*edit);
        }));

        buffer.apply_edit(0, 1, "zz");
        let events = seen.lock();
        assert_eq!(events.as_slice(), &[BufferEdit::new(0, 1, 2)]);
    }

    #[test]
    fn subscription_drop_removes_listener() {
        let buffer = SharedBuffer::new("abc", "text");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = buffer.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(buffer.listener_count(), 1);

        drop(subscription);
        assert_eq!(buffer.listener_count(), 0);

        buffer.apply_edit(0, 0, "x");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let buffer = SharedBuffer::new("abc", "text");
        let mut subscription = buffer.subscribe(Box::new(|_| {}));
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert_eq!(buffer.listener_count(), 0);
    }

    #[test]
    fn multibyte_text_uses_character_offsets() {
        let buffer = SharedBuffer::new("héllo", "text");
        buffer.apply_edit(1, 1, "e");
        assert_eq!(buffer.text(), "hello");
    }
}
