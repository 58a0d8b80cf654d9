//! Trigger detection and completion lifecycle core for Oryza
//!
//! This crate decides *when* an autocomplete request fires as the user types,
//! runs the single-flight request cycle, hands the suggestion set to the
//! editor's completion popup exactly once, and later samples the ground-truth
//! line to report whether the suggestion survived.
//!
//! # Architecture
//!
//! The lifecycle is a pipeline of small session-scoped components:
//!
//! 1. **Trigger scanner** ([`TriggerScanner`]): inspects the buffer on every
//!    edit and matches a backward window against the trigger-point table
//! 2. **Context extractor** ([`ContextWindow`]): splits the buffer at the
//!    cursor into budget-capped left/right context
//! 3. **Prediction client** (`oryza-api`): single-flight network round trip
//! 4. **Completion cache** ([`CompletionCache`]): at-most-once hand-off from
//!    the async fetch to the synchronous UI completion pass
//! 5. **Verification scheduler** ([`VerificationScheduler`]): delayed,
//!    cancellable ground-truth sampling with offset tracking across edits
//!
//! [`CompletionSession`] wires the pieces together and is the only type an
//! embedding host needs to drive; the host supplies the [`CompletionUi`]
//! boundary for hints, error notifications, and popup invocation.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod session;
pub mod trigger;
pub mod verify;

pub use cache::{CompletionCache, PendingCompletion};
pub use config::{CompletionConfig, COMPACT_CONTEXT_BUDGET, EXTENDED_CONTEXT_BUDGET};
pub use context::ContextWindow;
pub use error::{CompletionError, Result};
pub use session::{CompletionSession, CompletionUi};
pub use trigger::{TriggerMatch, TriggerPoints, TriggerScanner};
pub use verify::{VerificationHandle, VerificationScheduler};
