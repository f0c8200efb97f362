//! Upload session state machine
//!
//! IDLE → SELECTED → SUBMITTING → SUCCEEDED | FAILED
//!
//! A terminal session returns to SELECTED when a new file is chosen.

use super::{CanonicalResult, Document, ErrorRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upload session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionPhase {
    /// No document chosen
    Idle,
    /// Valid document chosen, ready to submit
    Selected,
    /// Transfer in flight
    Submitting,
    /// Result available
    Succeeded,
    /// Error available
    Failed,
}

impl SessionPhase {
    /// Whether the state machine permits `self → next`
    pub fn can_transition_to(self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Idle | Selected | Succeeded | Failed, Selected)
                | (Selected, Submitting)
                | (Submitting, Succeeded | Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Succeeded | SessionPhase::Failed)
    }
}

/// State transition event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub session_id: Uuid,
    pub old_phase: SessionPhase,
    pub new_phase: SessionPhase,
    pub transitioned_at: DateTime<Utc>,
}

/// Upload session data (in-memory only)
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Unique session identifier
    pub session_id: Uuid,

    /// Current phase
    pub phase: SessionPhase,

    /// Chosen document, owned by the session
    pub document: Option<Document>,

    /// Synthetic progress estimate (0.0 - 100.0)
    pub progress_percent: f64,

    pub last_error: Option<ErrorRecord>,

    pub result: Option<CanonicalResult>,

    /// Number of accepted submits so far
    pub attempt: u64,

    pub created_at: DateTime<Utc>,

    /// When the last submit settled
    pub settled_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            phase: SessionPhase::Idle,
            document: None,
            progress_percent: 0.0,
            last_error: None,
            result: None,
            attempt: 0,
            created_at: Utc::now(),
            settled_at: None,
        }
    }

    /// Transition to a new phase
    ///
    /// Callers check [`SessionPhase::can_transition_to`] first.
    pub fn transition_to(&mut self, new_phase: SessionPhase) -> StateTransition {
        debug_assert!(
            self.phase.can_transition_to(new_phase),
            "illegal transition {:?} -> {:?}",
            self.phase,
            new_phase
        );

        let transition = StateTransition {
            session_id: self.session_id,
            old_phase: self.phase,
            new_phase,
            transitioned_at: Utc::now(),
        };
        self.phase = new_phase;

        if new_phase.is_terminal() {
            self.settled_at = Some(transition.transitioned_at);
        }

        transition
    }

    /// Set progress, clamped to 0-100
    pub fn set_progress(&mut self, percent: f64) {
        self.progress_percent = percent.clamp(0.0, 100.0);
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.name())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
