//! Buffer edit events

/// A single document edit, described in character offsets
///
/// `old_len` characters starting at `offset` were replaced by `new_len` characters.
/// Insertions have `old_len == 0`, deletions have `new_len == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferEdit {
    /// Character offset at which the edit starts
    pub offset: usize,
    /// Number of characters removed
    pub old_len: usize,
    /// Number of characters inserted
    pub new_len: usize,
}

impl BufferEdit {
    pub fn new(offset: usize, old_len: usize, new_len: usize) -> Self {
        Self {
            offset,
            old_len,
            new_len,
        }
    }

    /// Net character delta introduced by this edit
    pub fn delta(&self) -> i64 {
        self.new_len as i64 - self.old_len as i64
    }
}
