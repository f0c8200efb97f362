//! Upload session driver
//!
//! Owns one [`SessionState`] and is the only thing that mutates it. A
//! session runs at most one transfer at a time: `submit` while a transfer is
//! in flight is rejected, not queued.

use super::analysis_client::{AnalysisTransport, TransportError};
use super::progress_estimator::ProgressEstimator;
use super::result_normalizer::{self, NormalizeError};
use crate::events::{EventBus, SessionEvent};
use crate::models::{
    CanonicalResult, Document, ErrorRecord, SessionPhase, SessionState, StateTransition,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use tuck_common::ClientConfig;
use uuid::Uuid;

pub const PDF_REQUIRED: &str = "Please select a PDF file";
pub const NO_FILE_SELECTED: &str = "Please select a file first";
pub const TRANSFER_IN_FLIGHT: &str = "An analysis is already in progress";
pub const RESELECT_REQUIRED: &str = "Select a file to start a new analysis";

/// Timing knobs for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Progress estimator cadence
    pub progress_tick: Duration,
    /// Delay before progress returns to 0 after a submit settles
    pub progress_reset_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            progress_tick: Duration::from_secs(1),
            progress_reset_delay: Duration::from_secs(2),
        }
    }
}

impl From<&ClientConfig> for SessionSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            progress_tick: config.progress_tick(),
            progress_reset_delay: config.progress_reset_delay(),
        }
    }
}

/// Map a transport failure onto the session error taxonomy
///
/// Priority: a failure status wins, then "no response", then everything
/// else is a local failure.
pub fn classify_transport_error(error: TransportError) -> ErrorRecord {
    let detail = error.detail();
    match error {
        TransportError::Status { status, .. } => ErrorRecord::server(status, detail),
        TransportError::NoResponse(message) => {
            ErrorRecord::network(format!("Unable to connect to server ({})", message))
        }
        err @ (TransportError::MalformedBody(_) | TransportError::Local(_)) => {
            ErrorRecord::client(err.to_string())
        }
    }
}

/// Map a normalization failure of a `status` response
pub fn classify_normalize_error(error: NormalizeError, status: u16) -> ErrorRecord {
    match error {
        NormalizeError::Reported(detail) => ErrorRecord::server(status, Some(detail)),
        other => ErrorRecord::client(other.to_string()),
    }
}

/// Upload session
pub struct UploadSession {
    session_id: Uuid,
    state: Arc<RwLock<SessionState>>,
    transport: Arc<dyn AnalysisTransport>,
    events: EventBus,
    settings: SessionSettings,
}

impl UploadSession {
    /// Create an idle session
    pub fn new(transport: Arc<dyn AnalysisTransport>, settings: SessionSettings) -> Self {
        Self::with_event_bus(transport, settings, EventBus::default())
    }

    pub fn with_event_bus(
        transport: Arc<dyn AnalysisTransport>,
        settings: SessionSettings,
        events: EventBus,
    ) -> Self {
        let state = SessionState::new();
        Self {
            session_id: state.session_id,
            state: Arc::new(RwLock::new(state)),
            transport,
            events,
            settings,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state for rendering
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    pub async fn progress_percent(&self) -> f64 {
        self.state.read().await.progress_percent
    }

    pub async fn last_error(&self) -> Option<ErrorRecord> {
        self.state.read().await.last_error.clone()
    }

    pub async fn result(&self) -> Option<CanonicalResult> {
        self.state.read().await.result.clone()
    }

    /// Choose the document to analyze
    ///
    /// Non-PDF candidates are rejected without storing them; the rejection
    /// is recorded as the session's last error. Rejected outright while a
    /// transfer is in flight.
    pub async fn select_file(&self, candidate: Document) -> Result<(), ErrorRecord> {
        let mut state = self.state.write().await;

        if state.phase == SessionPhase::Submitting {
            warn!(session_id = %self.session_id, "File selection rejected during transfer");
            return Err(ErrorRecord::validation(TRANSFER_IN_FLIGHT));
        }

        if !candidate.is_accepted_type() {
            warn!(
                session_id = %self.session_id,
                file = %candidate.name(),
                media_type = %candidate.declared_media_type(),
                "Rejected document that is not a PDF"
            );
            let error = ErrorRecord::validation(PDF_REQUIRED);
            state.last_error = Some(error.clone());
            return Err(error);
        }

        info!(
            session_id = %self.session_id,
            file = %candidate.name(),
            bytes = candidate.byte_size(),
            "Document selected"
        );
        state.document = Some(candidate);
        state.last_error = None;
        state.result = None;
        let transition = state.transition_to(SessionPhase::Selected);
        drop(state);

        self.publish_transition(transition);
        Ok(())
    }

    /// Send the selected document for analysis and wait for the outcome
    ///
    /// Only a SELECTED session may submit. The returned error is also stored
    /// as the session's last error when the submit was accepted.
    pub async fn submit(&self) -> Result<CanonicalResult, ErrorRecord> {
        let (document, attempt, transition) = {
            let mut state = self.state.write().await;

            let document = match (state.phase, state.document.clone()) {
                (SessionPhase::Selected, Some(document)) => document,
                (SessionPhase::Idle, _) | (SessionPhase::Selected, None) => {
                    let error = ErrorRecord::validation(NO_FILE_SELECTED);
                    state.last_error = Some(error.clone());
                    return Err(error);
                }
                (SessionPhase::Submitting, _) => {
                    warn!(session_id = %self.session_id, "Submit rejected: transfer already in flight");
                    return Err(ErrorRecord::validation(TRANSFER_IN_FLIGHT));
                }
                (SessionPhase::Succeeded | SessionPhase::Failed, _) => {
                    return Err(ErrorRecord::validation(RESELECT_REQUIRED));
                }
            };

            state.attempt += 1;
            state.set_progress(0.0);
            state.last_error = None;
            let transition = state.transition_to(SessionPhase::Submitting);
            (document, state.attempt, transition)
        };

        self.publish_transition(transition);
        self.events.emit_lossy(SessionEvent::SubmitStarted {
            session_id: self.session_id,
            attempt,
            document: document.name().to_string(),
        });
        info!(
            session_id = %self.session_id,
            attempt,
            file = %document.name(),
            "Submitting document for analysis"
        );

        let estimator = ProgressEstimator::start(
            self.state.clone(),
            self.events.clone(),
            self.session_id,
            attempt,
            self.settings.progress_tick,
        );

        let outcome = match self.transport.analyze(&document).await {
            Ok(response) => result_normalizer::normalize(&response.body)
                .map_err(|e| classify_normalize_error(e, response.status)),
            Err(error) => Err(classify_transport_error(error)),
        };

        estimator.stop();

        self.settle(attempt, outcome).await
    }

    async fn settle(
        &self,
        attempt: u64,
        outcome: Result<CanonicalResult, ErrorRecord>,
    ) -> Result<CanonicalResult, ErrorRecord> {
        let mut state = self.state.write().await;
        let transition = match &outcome {
            Ok(result) => {
                state.set_progress(100.0);
                state.result = Some(result.clone());
                state.transition_to(SessionPhase::Succeeded)
            }
            Err(error) => {
                state.last_error = Some(error.clone());
                state.transition_to(SessionPhase::Failed)
            }
        };
        drop(state);

        self.publish_transition(transition);
        match &outcome {
            Ok(result) => {
                info!(
                    session_id = %self.session_id,
                    attempt,
                    total_errors_found = result.total_errors_found,
                    total_pages_analyzed = result.total_pages_analyzed,
                    "Analysis succeeded"
                );
                self.events.emit_lossy(SessionEvent::ProgressUpdated {
                    session_id: self.session_id,
                    attempt,
                    percent: 100.0,
                });
                self.events.emit_lossy(SessionEvent::Succeeded {
                    session_id: self.session_id,
                    attempt,
                    total_errors_found: result.total_errors_found,
                    total_pages_analyzed: result.total_pages_analyzed,
                });
            }
            Err(error) => {
                warn!(
                    session_id = %self.session_id,
                    attempt,
                    kind = error.kind(),
                    "Analysis failed: {}",
                    error
                );
                self.events.emit_lossy(SessionEvent::Failed {
                    session_id: self.session_id,
                    attempt,
                    error: error.clone(),
                });
            }
        }

        self.schedule_progress_reset(attempt);
        outcome
    }

    /// Return progress to 0 shortly after a submit settles
    ///
    /// Skipped when a later attempt has started in the meantime.
    fn schedule_progress_reset(&self, attempt: u64) {
        let state = self.state.clone();
        let events = self.events.clone();
        let session_id = self.session_id;
        let delay = self.settings.progress_reset_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut guard = state.write().await;
            if guard.attempt != attempt || guard.phase == SessionPhase::Submitting {
                return;
            }
            guard.set_progress(0.0);
            drop(guard);

            debug!(%session_id, attempt, "Progress reset");
            events.emit_lossy(SessionEvent::ProgressUpdated {
                session_id,
                attempt,
                percent: 0.0,
            });
        });
    }

    fn publish_transition(&self, transition: StateTransition) {
        debug!(
            session_id = %transition.session_id,
            old_phase = ?transition.old_phase,
            new_phase = ?transition.new_phase,
            "Session phase changed"
        );
        self.events.emit_lossy(SessionEvent::PhaseChanged(transition));
    }
}
