//! Session lifecycle state machine
//!
//! Tracks the single relayed account session through its lifecycle and keeps
//! a bounded audit trail of transitions. Transitions are driven by normalized
//! events; content events (messages, acks) never move the state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::NormalizedEvent;
use crate::types::Timestamp;

/// Maximum number of audit entries retained
const MAX_AUDIT_ENTRIES: usize = 64;

// ----------------------------------------------------------------------------
// Session State
// ----------------------------------------------------------------------------

/// Lifecycle state of the relayed account session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Starting up, no signal from the upstream session yet
    Initializing,
    /// A pairing secret has been issued and is awaiting scan
    AwaitingAuthentication,
    /// Authenticated and connected
    Ready,
    /// Connection lost
    Disconnected,
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::AwaitingAuthentication => "awaiting_authentication",
            Self::Ready => "ready",
            Self::Disconnected => "disconnected",
        };
        write!(f, "{name}")
    }
}

// ----------------------------------------------------------------------------
// Audit Trail
// ----------------------------------------------------------------------------

/// Record of one state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: Timestamp,
    pub from_state: SessionState,
    pub to_state: SessionState,
    /// Short name of the event that caused the transition
    pub event: String,
}

// ----------------------------------------------------------------------------
// State Machine
// ----------------------------------------------------------------------------

/// Session state machine with a bounded audit trail.
///
/// `apply_event` is idempotent: an event that maps to the current state
/// produces no transition and no audit entry.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    state: SessionState,
    audit: Vec<AuditEntry>,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Initializing,
            audit: Vec::new(),
        }
    }

    /// Current lifecycle state
    pub fn current_state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Transitions recorded so far, oldest first
    pub fn audit_trail(&self) -> &[AuditEntry] {
        &self.audit
    }

    /// Apply a normalized event and return the (possibly unchanged) state.
    ///
    /// Lifecycle events move the machine; content events leave it alone.
    pub fn apply_event(&mut self, event: &NormalizedEvent) -> SessionState {
        let target = match event {
            NormalizedEvent::QrIssued { .. } => Some(SessionState::AwaitingAuthentication),
            NormalizedEvent::StatusChanged { ready: true, .. } => Some(SessionState::Ready),
            NormalizedEvent::StatusChanged { ready: false, .. } => {
                Some(SessionState::Disconnected)
            }
            _ => None,
        };

        if let Some(to_state) = target {
            if to_state != self.state {
                self.record_transition(to_state, event.event_name());
            }
        }

        self.state
    }

    fn record_transition(&mut self, to_state: SessionState, event: &str) {
        if self.audit.len() >= MAX_AUDIT_ENTRIES {
            self.audit.remove(0);
        }
        self.audit.push(AuditEntry {
            timestamp: Timestamp::now(),
            from_state: self.state,
            to_state,
            event: event.to_string(),
        });
        self.state = to_state;
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AckLevel, MessageId};

    fn qr() -> NormalizedEvent {
        NormalizedEvent::QrIssued {
            secret: "s".to_string(),
        }
    }

    fn status(ready: bool) -> NormalizedEvent {
        NormalizedEvent::StatusChanged {
            ready,
            message: "m".to_string(),
        }
    }

    #[test]
    fn test_lifecycle_progression() {
        let mut machine = SessionStateMachine::new();
        assert_eq!(machine.current_state(), SessionState::Initializing);

        machine.apply_event(&qr());
        assert_eq!(machine.current_state(), SessionState::AwaitingAuthentication);

        machine.apply_event(&status(true));
        assert!(machine.is_ready());

        machine.apply_event(&status(false));
        assert_eq!(machine.current_state(), SessionState::Disconnected);

        assert_eq!(machine.audit_trail().len(), 3);
        assert_eq!(machine.audit_trail()[1].from_state, SessionState::AwaitingAuthentication);
        assert_eq!(machine.audit_trail()[1].to_state, SessionState::Ready);
    }

    #[test]
    fn test_repeated_event_is_idempotent() {
        let mut machine = SessionStateMachine::new();
        machine.apply_event(&qr());
        machine.apply_event(&qr());
        machine.apply_event(&qr());
        assert_eq!(machine.current_state(), SessionState::AwaitingAuthentication);
        assert_eq!(machine.audit_trail().len(), 1);
    }

    #[test]
    fn test_reconnect_after_disconnect() {
        let mut machine = SessionStateMachine::new();
        machine.apply_event(&status(true));
        machine.apply_event(&status(false));
        machine.apply_event(&qr());
        machine.apply_event(&status(true));
        assert!(machine.is_ready());
        assert_eq!(machine.audit_trail().len(), 4);
    }

    #[test]
    fn test_content_events_do_not_transition() {
        let mut machine = SessionStateMachine::new();
        machine.apply_event(&status(true));

        machine.apply_event(&NormalizedEvent::MessageReceived {
            from: "+1".to_string(),
            body: "hi".to_string(),
            timestamp: Timestamp::from_millis(1),
        });
        machine.apply_event(&NormalizedEvent::AckUpdated {
            message_id: MessageId::new("m"),
            ack: AckLevel::Read,
        });

        assert!(machine.is_ready());
        assert_eq!(machine.audit_trail().len(), 1);
    }

    #[test]
    fn test_audit_trail_is_bounded() {
        let mut machine = SessionStateMachine::new();
        for _ in 0..100 {
            machine.apply_event(&status(true));
            machine.apply_event(&status(false));
        }
        assert!(machine.audit_trail().len() <= MAX_AUDIT_ENTRIES);
    }
}
