//! Event schema for the relay
//!
//! Two event layers cross the relay. `SessionEvent` is the raw, loosely
//! structured stream the session transport produces. `NormalizedEvent` is the
//! typed schema the runtime tracks, broadcasts, and dispatches commands from.
//! Every broadcast to observers is a `NormalizedEvent` rendered through
//! [`NormalizedEvent::event_name`] and [`NormalizedEvent::payload`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::types::{AckLevel, Direction, MessageId, Timestamp};

// ----------------------------------------------------------------------------
// Raw Session Events
// ----------------------------------------------------------------------------

/// Raw event emitted by the session transport, before normalization.
///
/// Message and ack payloads arrive as loosely structured JSON because the
/// upstream client library does not guarantee a fixed shape; the normalizer
/// is responsible for validating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Authentication secret issued, pairing required
    Qr { secret: String },
    /// Session authenticated and connected
    Ready,
    /// Session lost its connection
    Disconnected { reason: String },
    /// Inbound or echoed message payload
    Message { payload: Value },
    /// Delivery acknowledgement update payload
    AckUpdate { payload: Value },
}

impl SessionEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Qr { .. } => "qr",
            Self::Ready => "ready",
            Self::Disconnected { .. } => "disconnected",
            Self::Message { .. } => "message",
            Self::AckUpdate { .. } => "ack_update",
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionEvent::{}", self.kind())
    }
}

// ----------------------------------------------------------------------------
// Normalized Events
// ----------------------------------------------------------------------------

/// Validated, typed event as tracked and broadcast by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NormalizedEvent {
    /// A fresh authentication secret is available for pairing
    QrIssued { secret: String },
    /// Session readiness changed
    StatusChanged { ready: bool, message: String },
    /// A message arrived from a remote party
    MessageReceived {
        from: String,
        body: String,
        timestamp: Timestamp,
    },
    /// A message left the relayed account (sent by the relay or echoed by
    /// another client on the same account)
    MessageSent {
        from: String,
        body: String,
        timestamp: Timestamp,
        message_id: MessageId,
    },
    /// Delivery acknowledgement level changed for an outbound message
    AckUpdated {
        message_id: MessageId,
        ack: AckLevel,
    },
    /// A prefix command finished executing
    CommandExecuted {
        command: String,
        from: String,
        timestamp: Timestamp,
    },
}

impl NormalizedEvent {
    /// Stable event name observers key their handling on
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::QrIssued { .. } => "qr",
            Self::StatusChanged { .. } => "status",
            Self::MessageReceived { .. } | Self::MessageSent { .. } => "new_message",
            Self::AckUpdated { .. } => "message_ack",
            Self::CommandExecuted { .. } => "command_executed",
        }
    }

    /// Message direction, for the two message-bearing variants
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::MessageReceived { .. } => Some(Direction::Incoming),
            Self::MessageSent { .. } => Some(Direction::Outgoing),
            _ => None,
        }
    }

    /// Render the observer-facing JSON payload for this event.
    ///
    /// Both message directions share the `new_message` shape; outgoing
    /// messages additionally carry the upstream id so later ack updates can
    /// be correlated.
    pub fn payload(&self) -> Value {
        match self {
            Self::QrIssued { secret } => Value::String(secret.clone()),
            Self::StatusChanged { ready, message } => json!({
                "ready": ready,
                "message": message,
            }),
            Self::MessageReceived {
                from,
                body,
                timestamp,
            } => json!({
                "from": from,
                "message": body,
                "timestamp": timestamp.as_millis(),
                "type": Direction::Incoming.as_str(),
            }),
            Self::MessageSent {
                from,
                body,
                timestamp,
                message_id,
            } => json!({
                "from": from,
                "message": body,
                "timestamp": timestamp.as_millis(),
                "type": Direction::Outgoing.as_str(),
                "id": message_id.as_str(),
            }),
            Self::AckUpdated { message_id, ack } => json!({
                "id": message_id.as_str(),
                "ack": ack.as_u8(),
            }),
            Self::CommandExecuted {
                command,
                from,
                timestamp,
            } => json!({
                "command": command,
                "from": from,
                "timestamp": timestamp.as_millis(),
            }),
        }
    }
}

impl fmt::Display for NormalizedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QrIssued { .. } => write!(f, "QrIssued"),
            Self::StatusChanged { ready, .. } => write!(f, "StatusChanged(ready={ready})"),
            Self::MessageReceived { from, .. } => write!(f, "MessageReceived(from={from})"),
            Self::MessageSent { message_id, .. } => write!(f, "MessageSent(id={message_id})"),
            Self::AckUpdated { message_id, ack } => {
                write!(f, "AckUpdated(id={message_id}, ack={ack})")
            }
            Self::CommandExecuted { command, .. } => write!(f, "CommandExecuted({command})"),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
