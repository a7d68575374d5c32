//! Shared session state tracking

use std::sync::{Arc, Mutex, PoisonError};

use chatdeck_core::{AuditEntry, NormalizedEvent, SessionState, SessionStateMachine};

// ----------------------------------------------------------------------------
// Session Tracker
// ----------------------------------------------------------------------------

/// Cloneable handle to the shared session state machine.
///
/// The relay task applies events; the gateway and runtime handle read the
/// state. The lock is never held across an await point.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    inner: Arc<Mutex<SessionStateMachine>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionStateMachine::new())),
        }
    }

    /// Apply a normalized event, returning the (possibly unchanged) state
    pub fn apply_event(&self, event: &NormalizedEvent) -> SessionState {
        self.lock().apply_event(event)
    }

    pub fn current_state(&self) -> SessionState {
        self.lock().current_state()
    }

    pub fn is_ready(&self) -> bool {
        self.lock().is_ready()
    }

    /// Snapshot of the transition audit trail
    pub fn audit_trail(&self) -> Vec<AuditEntry> {
        self.lock().audit_trail().to_vec()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionStateMachine> {
        // State machine methods cannot panic mid-update, so a poisoned lock
        // still guards consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
