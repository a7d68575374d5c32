//! Trait seams the runtime is generic over
//!
//! `SessionTransport` abstracts the upstream messaging session the relay
//! drives; `ObserverSink` abstracts one connected dashboard observer. The
//! runtime holds both as trait objects so production transports and test
//! doubles plug in the same way.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{DeliveryError, TransportError};
use crate::types::{ChatSummary, ContactInfo, MessageId};

// ----------------------------------------------------------------------------
// Session Transport
// ----------------------------------------------------------------------------

/// Outbound surface of the upstream messaging session
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Send a text message to a chat, returning the upstream message id
    async fn send_text(&self, chat_id: &str, body: &str) -> Result<MessageId, TransportError>;

    /// Fetch profile details for a sender
    async fn fetch_contact_info(&self, sender_id: &str) -> Result<ContactInfo, TransportError>;

    /// List the most recent conversations, up to `limit`
    async fn list_recent_chats(&self, limit: usize) -> Result<Vec<ChatSummary>, TransportError>;
}

// ----------------------------------------------------------------------------
// Observer Sink
// ----------------------------------------------------------------------------

/// One connected dashboard observer
#[async_trait]
pub trait ObserverSink: Send + Sync {
    /// Deliver one named event payload to this observer
    async fn deliver(&self, event_name: &str, payload: &Value) -> Result<(), DeliveryError>;
}
