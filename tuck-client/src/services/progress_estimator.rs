//! Synthetic upload progress
//!
//! The analysis service reports nothing until it answers, so progress while
//! a submit is in flight is an estimate: every tick adds a random step of up
//! to [`MAX_STEP`] points, never passing [`ESTIMATE_CAP`]. Only a completed
//! transfer moves progress to 100.

use crate::events::{EventBus, SessionEvent};
use crate::models::{SessionPhase, SessionState};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Highest value the estimate may reach
pub const ESTIMATE_CAP: f64 = 90.0;

/// Upper bound (exclusive) of a single tick's step
pub const MAX_STEP: f64 = 15.0;

/// Advance an estimate by `step`, capped at [`ESTIMATE_CAP`]
pub fn next_estimate(current: f64, step: f64) -> f64 {
    if current >= ESTIMATE_CAP {
        current
    } else {
        (current + step.max(0.0)).min(ESTIMATE_CAP)
    }
}

/// Status line for a progress value
pub fn progress_message(percent: f64) -> &'static str {
    match percent {
        p if p < 20.0 => "Uploading PDF file...",
        p if p < 40.0 => "Extracting text from pages...",
        p if p < 60.0 => "Analyzing format compliance...",
        p if p < 80.0 => "Checking TU standards...",
        p if p < 100.0 => "Finalizing results...",
        _ => "Analysis complete!",
    }
}

/// Rough seconds remaining, assuming ten points per second
pub fn estimated_remaining_secs(percent: f64) -> u64 {
    let remaining = ((100.0 - percent) / 10.0).round();
    remaining.max(1.0) as u64
}

/// Running estimator for one submit attempt
///
/// Stops when dropped, so every exit path of a submit releases it.
pub struct ProgressEstimator {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ProgressEstimator {
    /// Start ticking every `tick` for `attempt`
    ///
    /// The task also exits on its own once the session leaves SUBMITTING or
    /// moves on to a later attempt.
    pub fn start(
        state: Arc<RwLock<SessionState>>,
        events: EventBus,
        session_id: Uuid,
        attempt: u64,
        tick: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + tick, tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let step = rand::thread_rng().gen_range(0.0..MAX_STEP);

                        let mut guard = state.write().await;
                        if guard.attempt != attempt || guard.phase != SessionPhase::Submitting {
                            break;
                        }
                        let percent = next_estimate(guard.progress_percent, step);
                        guard.set_progress(percent);
                        drop(guard);

                        tracing::debug!(attempt, percent, "Progress estimate advanced");
                        events.emit_lossy(SessionEvent::ProgressUpdated {
                            session_id,
                            attempt,
                            percent,
                        });
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Stop the estimator now
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ProgressEstimator {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_estimate_caps_at_ninety() {
        assert_eq!(next_estimate(0.0, 10.0), 10.0);
        assert_eq!(next_estimate(85.0, 14.9), ESTIMATE_CAP);
        assert_eq!(next_estimate(ESTIMATE_CAP, 5.0), ESTIMATE_CAP);
        assert_eq!(next_estimate(40.0, -3.0), 40.0);
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(progress_message(0.0), "Uploading PDF file...");
        assert_eq!(progress_message(25.0), "Extracting text from pages...");
        assert_eq!(progress_message(59.9), "Analyzing format compliance...");
        assert_eq!(progress_message(60.0), "Checking TU standards...");
        assert_eq!(progress_message(90.0), "Finalizing results...");
        assert_eq!(progress_message(100.0), "Analysis complete!");
    }

    #[test]
    fn test_estimated_remaining() {
        assert_eq!(estimated_remaining_secs(0.0), 10);
        assert_eq!(estimated_remaining_secs(42.0), 6);
        assert_eq!(estimated_remaining_secs(99.0), 1);
        assert_eq!(estimated_remaining_secs(100.0), 1);
    }

    fn submitting_state() -> Arc<RwLock<SessionState>> {
        let mut state = SessionState::new();
        state.phase = SessionPhase::Submitting;
        state.attempt = 1;
        Arc::new(RwLock::new(state))
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimator_advances_and_stays_capped() {
        let state = submitting_state();
        let estimator = ProgressEstimator::start(
            state.clone(),
            EventBus::new(64),
            Uuid::new_v4(),
            1,
            Duration::from_secs(1),
        );

        let mut last = 0.0;
        for _ in 0..30 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let percent = state.read().await.progress_percent;
            assert!(percent >= last, "estimate went backwards");
            assert!(percent <= ESTIMATE_CAP);
            last = percent;
        }

        estimator.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let state = submitting_state();
        let estimator = ProgressEstimator::start(
            state.clone(),
            EventBus::new(64),
            Uuid::new_v4(),
            1,
            Duration::from_secs(1),
        );
        drop(estimator);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(state.read().await.progress_percent, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exits_when_phase_changes() {
        let state = submitting_state();
        let estimator = ProgressEstimator::start(
            state.clone(),
            EventBus::new(64),
            Uuid::new_v4(),
            1,
            Duration::from_secs(1),
        );

        state.write().await.phase = SessionPhase::Failed;
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(estimator.is_finished());
        assert_eq!(state.read().await.progress_percent, 0.0);
    }
}
