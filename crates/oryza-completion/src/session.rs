//! Session orchestrator wiring scanner, client, cache, and scheduler together

use std::sync::Arc;

use oryza_api::{ApiError, AutocompleteRequest, PredictionApi};
use oryza_buffer::{BufferEdit, EditorBuffer};
use oryza_config::SettingsManager;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::{CompletionCache, PendingCompletion};
use crate::config::CompletionConfig;
use crate::context::ContextWindow;
use crate::trigger::{TriggerPoints, TriggerScanner};
use crate::verify::{VerificationHandle, VerificationScheduler};

const NO_SUGGESTIONS_HINT: &str = "No suggestions available";
const REQUEST_FAILED_MESSAGE: &str = "Completion request failed";

/// IDE boundary consumed by the session
///
/// Implementations render hints, notifications, the completion popup, and the
/// survey prompt; the core never draws anything itself.
pub trait CompletionUi: Send + Sync {
    /// Informational hint next to the cursor (not an error notification)
    fn show_hint(&self, message: &str);

    /// Error notification
    fn show_error(&self, message: &str);

    /// Open the editor's native completion popup, which will pull from the cache
    fn invoke_completion_popup(&self);

    /// Ask the user to take the survey
    fn prompt_survey(&self);
}

struct ArmedVerification {
    handle: VerificationHandle,
    offset: usize,
    verify_token: String,
}

/// One editor session's completion lifecycle
///
/// Owns the cache and verification bookkeeping for the session; no ambient
/// global state. All asynchronous failures are funneled into the UI boundary
/// and never reach the document-edit path. Fetches and verification reports
/// are spawned onto the ambient Tokio runtime, so the session must be driven
/// from within one.
pub struct CompletionSession {
    api: Arc<dyn PredictionApi>,
    scanner: TriggerScanner,
    cache: Arc<CompletionCache>,
    settings: Arc<SettingsManager>,
    scheduler: VerificationScheduler,
    ui: Arc<dyn CompletionUi>,
    config: CompletionConfig,
    armed: Mutex<Option<ArmedVerification>>,
}

impl CompletionSession {
    pub fn new(
        api: Arc<dyn PredictionApi>,
        triggers: Arc<TriggerPoints>,
        settings: Arc<SettingsManager>,
        ui: Arc<dyn CompletionUi>,
        config: CompletionConfig,
    ) -> Self {
        let scheduler =
            VerificationScheduler::new(Arc::clone(&api), Arc::clone(&ui), config.verify_delay);
        Self {
            api,
            scanner: TriggerScanner::new(triggers),
            cache: Arc::new(CompletionCache::new()),
            settings,
            scheduler,
            ui,
            config,
            armed: Mutex::new(None),
        }
    }

    /// React to a buffer edit: scan for a trigger point and fire a completion
    /// request when one matches
    pub fn handle_edit(&self, buffer: &Arc<dyn EditorBuffer>, edit: &BufferEdit) {
        if !self.settings.trigger_points() {
            return;
        }

        let text = buffer.text();
        let cursor = buffer.cursor_offset();
        debug!(offset = edit.offset, cursor, "scanning edit for trigger points");

        if let Some(matched) = self.scanner.scan(&text, cursor) {
            self.request_completion(Arc::clone(buffer), matched.offset, Some(matched.token));
        }
    }

    /// Fire a completion request at `offset`
    ///
    /// `trigger` is the matched trigger token; `None` marks a keybind-triggered
    /// request, for which a fallback token is derived from the left context.
    pub fn request_completion(
        &self,
        buffer: Arc<dyn EditorBuffer>,
        offset: usize,
        trigger: Option<String>,
    ) {
        let text = buffer.text();
        let window = ContextWindow::extract(&text, offset, self.config.context_budget);
        let keybind = trigger.is_none();
        let trigger_point = trigger.or_else(|| window.derive_trigger(self.scanner.points()));

        let request = AutocompleteRequest {
            left_context: window.left,
            right_context: window.right,
            trigger_point,
            language: buffer.language_id(),
            ide: self.config.ide.clone(),
            keybind,
            plugin_version: self.config.plugin_version.clone(),
            store_context: self.settings.store_context(),
        };

        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        let ui = Arc::clone(&self.ui);
        let settings = Arc::clone(&self.settings);

        tokio::spawn(async move {
            match api.autocomplete(&request).await {
                Ok(response) => {
                    if response.survey && !settings.ignore_survey() {
                        ui.prompt_survey();
                    }
                    if response.is_blank() {
                        ui.show_hint(NO_SUGGESTIONS_HINT);
                        return;
                    }
                    cache.store(PendingCompletion {
                        predictions: response.predictions,
                        offset,
                        verify_token: response.verify_token,
                    });
                    ui.invoke_completion_popup();
                }
                Err(ApiError::AlreadyInFlight) => {
                    // a previous fetch is still outstanding, nothing to show
                    debug!("completion request skipped, already in flight");
                }
                Err(ApiError::Server { message, .. }) => {
                    ui.show_error(&message);
                }
                Err(err) => {
                    warn!(error = %err, "completion request failed");
                    ui.show_error(REQUEST_FAILED_MESSAGE);
                }
            }
        });
    }

    /// UI completion pass: hand over the cached suggestion set, at most once
    ///
    /// A hit arms the shown-path verification; an empty cache means the popup
    /// has nothing from us and performs no action.
    pub fn pull_completions(&self, buffer: &Arc<dyn EditorBuffer>) -> Option<Vec<String>> {
        let entry = self.cache.take()?;

        let handle = self.scheduler.arm(
            Arc::clone(buffer),
            entry.offset,
            entry.verify_token.clone(),
            None,
        );
        *self.armed.lock() = Some(ArmedVerification {
            handle,
            offset: entry.offset,
            verify_token: entry.verify_token,
        });

        Some(entry.predictions)
    }

    /// The user accepted `chosen` from the popup
    ///
    /// Replaces the shown-path verification with an accept-path one carrying
    /// the chosen suggestion. If the shown-path report already fired, this is a
    /// no-op so only one report is sent per suggestion instance.
    pub fn accept(&self, buffer: &Arc<dyn EditorBuffer>, chosen: &str) {
        let Some(armed) = self.armed.lock().take() else {
            return;
        };
        if !armed.handle.cancel() {
            return;
        }
        let _replacement = self.scheduler.arm(
            Arc::clone(buffer),
            armed.offset,
            armed.verify_token,
            Some(chosen.to_string()),
        );
    }
}
