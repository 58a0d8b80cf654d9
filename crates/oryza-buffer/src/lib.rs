//! Editor buffer collaborator interface for Oryza
//!
//! The completion core never owns the document it works on. This crate defines the
//! boundary it consumes instead:
//!
//! - [`EditorBuffer`]: read-only view of an editor document (text snapshot, cursor
//!   offset, language id) plus change notifications
//! - [`BufferEdit`]: a single edit event in character offsets
//! - [`ChangeSubscription`]: scoped listener handle released deterministically
//! - [`SharedBuffer`]: in-memory implementation used by embedding hosts and tests
//!
//! All offsets are character offsets, not byte offsets. Listeners are invoked
//! synchronously on the thread that applies the edit.

pub mod buffer;
pub mod edit;

pub use buffer::{ChangeListener, ChangeSubscription, EditorBuffer, SharedBuffer};
pub use edit::BufferEdit;
