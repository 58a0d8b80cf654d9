//! Delayed ground-truth verification with offset tracking

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use oryza_api::{ApiError, PredictionApi, VerifyRequest};
use oryza_buffer::EditorBuffer;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::session::CompletionUi;

/// Schedules one ground-truth report per suggestion instance
///
/// Arming attaches a change listener that keeps the watch offset in step with
/// edits landing before it. After the delay the scheduler samples the line at
/// the (possibly shifted) offset and submits the verify report. Firings run
/// one at a time in submission order; reports are never retried.
pub struct VerificationScheduler {
    api: Arc<dyn PredictionApi>,
    ui: Arc<dyn CompletionUi>,
    delay: Duration,
    run_lock: Arc<tokio::sync::Mutex<()>>,
}

impl VerificationScheduler {
    pub fn new(api: Arc<dyn PredictionApi>, ui: Arc<dyn CompletionUi>, delay: Duration) -> Self {
        Self {
            api,
            ui,
            delay,
            run_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm a verification for the suggestion applying at `offset`
    ///
    /// `chosen` is the accepted suggestion, or `None` for a suggestion that was
    /// shown but not accepted. The returned handle cancels the pending report;
    /// dropping it does not.
    pub fn arm(
        &self,
        buffer: Arc<dyn EditorBuffer>,
        offset: usize,
        verify_token: String,
        chosen: Option<String>,
    ) -> VerificationHandle {
        let tracked = Arc::new(AtomicI64::new(offset as i64));
        let subscription = {
            let tracked = Arc::clone(&tracked);
            buffer.subscribe(Box::new(move |edit| {
                // edits strictly before the watch point shift where it lands;
                // edits at or after it do not
                if (edit.offset as i64) < tracked.load(Ordering::SeqCst) {
                    tracked.fetch_add(edit.delta(), Ordering::SeqCst);
                }
            }))
        };

        let settled = Arc::new(AtomicBool::new(false));
        let api = Arc::clone(&self.api);
        let ui = Arc::clone(&self.ui);
        let run_lock = Arc::clone(&self.run_lock);
        let delay = self.delay;
        let claim = Arc::clone(&settled);

        let task = tokio::spawn(async move {
            let mut subscription = subscription;
            tokio::time::sleep(delay).await;

            // whoever flips the flag first wins; the loser is a no-op
            if claim.swap(true, Ordering::SeqCst) {
                return;
            }

            let _serialized = run_lock.lock().await;
            subscription.unsubscribe();

            let text = buffer.text();
            let start = tracked.load(Ordering::SeqCst).max(0) as usize;
            let ground_truth = line_at(&text, start);
            debug!(verify_token = %verify_token, offset = start, "submitting verify report");

            let request = VerifyRequest {
                verify_token,
                chosen_prediction: chosen,
                ground_truth,
            };
            match api.verify(&request).await {
                Ok(_) => {}
                Err(ApiError::Server { ref message, .. }) => {
                    warn!(error = %message, "verify report rejected by server");
                    ui.show_error(message);
                }
                Err(err) => {
                    // losing one telemetry sample is acceptable, no retry
                    warn!(error = %err, "verify report failed");
                }
            }
        });

        VerificationHandle { settled, task }
    }
}

impl std::fmt::Debug for VerificationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationScheduler")
            .field("delay", &self.delay)
            .finish()
    }
}

/// Cancellation handle for an armed verification
///
/// Cancelling and firing race by design; exactly one of them wins.
#[derive(Debug)]
pub struct VerificationHandle {
    settled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl VerificationHandle {
    /// Cancel the pending report
    ///
    /// Returns `true` when the report had not fired yet and is now cancelled;
    /// `false` when the timer already won the race.
    pub fn cancel(&self) -> bool {
        if self.settled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.task.abort();
        debug!("pending verification cancelled");
        true
    }

    /// Wait for the scheduled task to finish, for tests that need the report
    /// on the wire before asserting
    pub async fn settled(self) {
        let _ = self.task.await;
    }
}

/// The line starting at `start` (a character offset) up to the next line break
/// or end of buffer
fn line_at(text: &str, start: usize) -> String {
    text.chars()
        .skip(start)
        .take_while(|c| *c != '\n')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_at_reads_to_the_next_break() {
        assert_eq!(line_at("abc\ndef", 0), "abc");
        assert_eq!(line_at("abc\ndef", 4), "def");
        assert_eq!(line_at("abc", 1), "bc");
        assert_eq!(line_at("abc", 9), "");
    }
}
