//! Session event broadcasting
//!
//! The upload session publishes its transitions and progress here; the
//! presentation layer subscribes to render them.

use crate::models::{ErrorRecord, StateTransition};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by an upload session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Phase changed
    PhaseChanged(StateTransition),

    /// A submit was accepted and the transfer is starting
    SubmitStarted {
        session_id: Uuid,
        attempt: u64,
        document: String,
    },

    /// Progress estimate moved
    ProgressUpdated {
        session_id: Uuid,
        attempt: u64,
        percent: f64,
    },

    /// Submit settled with a result
    Succeeded {
        session_id: Uuid,
        attempt: u64,
        total_errors_found: u64,
        total_pages_analyzed: u64,
    },

    /// Submit settled with an error
    Failed {
        session_id: Uuid,
        attempt: u64,
        error: ErrorRecord,
    },
}

/// Broadcast channel for [`SessionEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SessionEvent,
    ) -> Result<usize, broadcast::error::SendError<SessionEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(percent: f64) -> SessionEvent {
        SessionEvent::ProgressUpdated {
            session_id: Uuid::new_v4(),
            attempt: 1,
            percent,
        }
    }

    #[test]
    fn test_emit_without_subscribers_fails() {
        let bus = EventBus::new(8);
        assert!(bus.emit(progress(1.0)).is_err());
        bus.emit_lossy(progress(2.0));
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.capacity(), 8);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        assert_eq!(bus.emit(progress(12.5)).unwrap(), 1);

        match rx.recv().await.unwrap() {
            SessionEvent::ProgressUpdated { percent, .. } => assert_eq!(percent, 12.5),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(SessionEvent::Failed {
            session_id: Uuid::nil(),
            attempt: 2,
            error: ErrorRecord::network("refused"),
        })
        .unwrap();

        assert_eq!(json["type"], "Failed");
        assert_eq!(json["attempt"], 2);
        assert_eq!(json["error"]["kind"], "network");
    }
}
