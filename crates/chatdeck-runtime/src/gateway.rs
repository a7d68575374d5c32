//! Validated outbound send path

use std::sync::Arc;

use tracing::{debug, warn};

use chatdeck_core::{
    canonical_number, chat_identifier, MessageId, NormalizedEvent, SendError, SessionTransport,
    Timestamp,
};

use crate::hub::BroadcastHub;
use crate::session::SessionTracker;

// ----------------------------------------------------------------------------
// Send Gateway
// ----------------------------------------------------------------------------

/// Receipt for an accepted outbound send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: MessageId,
}

/// The single outbound send path.
///
/// Every outgoing message, whether requested through the runtime handle or
/// synthesized as a command reply, goes through [`SendGateway::send_message`]:
/// validate, gate on session readiness, canonicalize the address, hand to
/// the transport, then broadcast the resulting `new_message` event.
pub struct SendGateway {
    transport: Arc<dyn SessionTransport>,
    session: SessionTracker,
    hub: Arc<BroadcastHub>,
}

impl SendGateway {
    pub fn new(
        transport: Arc<dyn SessionTransport>,
        session: SessionTracker,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            transport,
            session,
            hub,
        }
    }

    /// Send a text message to a recipient number.
    ///
    /// The recipient may be given with or without a leading `+`. Validation
    /// and the readiness gate run before the transport is touched. The body
    /// is forwarded verbatim; emptiness is checked on a trimmed view only.
    pub async fn send_message(
        &self,
        recipient: &str,
        body: &str,
    ) -> Result<SentMessage, SendError> {
        let recipient = recipient.trim();

        if recipient.is_empty() {
            return Err(SendError::invalid_input("recipient must not be empty"));
        }
        if body.trim().is_empty() {
            return Err(SendError::invalid_input("message body must not be empty"));
        }
        if !self.session.is_ready() {
            warn!(state = %self.session.current_state(), "rejecting send, session not ready");
            return Err(SendError::NotReady);
        }

        let number = canonical_number(recipient);
        let chat_id = chat_identifier(&number);

        let message_id = self.transport.send_text(&chat_id, body).await?;
        debug!(%chat_id, %message_id, "message sent");

        let event = NormalizedEvent::MessageSent {
            from: number,
            body: body.to_string(),
            timestamp: Timestamp::now(),
            message_id: message_id.clone(),
        };
        self.hub.broadcast(&event).await;

        Ok(SentMessage { message_id })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatdeck_core::{ChatSummary, ContactInfo, TransportError};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    struct MockTransport {
        sends: Mutex<Vec<(String, String)>>,
        counter: AtomicU64,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                sends: Mutex::new(Vec::new()),
                counter: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl SessionTransport for MockTransport {
        async fn send_text(
            &self,
            chat_id: &str,
            body: &str,
        ) -> Result<MessageId, TransportError> {
            self.sends
                .lock()
                .unwrap()
                .push((chat_id.to_string(), body.to_string()));
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(MessageId::new(format!("msg-{n}")))
        }

        async fn fetch_contact_info(
            &self,
            _sender_id: &str,
        ) -> Result<ContactInfo, TransportError> {
            Err(TransportError::FetchFailed("unused".to_string()))
        }

        async fn list_recent_chats(
            &self,
            _limit: usize,
        ) -> Result<Vec<ChatSummary>, TransportError> {
            Ok(Vec::new())
        }
    }

    fn ready_session() -> SessionTracker {
        let session = SessionTracker::new();
        session.apply_event(&NormalizedEvent::StatusChanged {
            ready: true,
            message: "up".to_string(),
        });
        session
    }

    #[tokio::test]
    async fn test_send_canonicalizes_recipient() {
        let transport = Arc::new(MockTransport::new());
        let gateway = SendGateway::new(
            transport.clone(),
            ready_session(),
            Arc::new(BroadcastHub::new()),
        );

        let sent = gateway.send_message("15551234567", "hello").await.unwrap();
        assert_eq!(sent.message_id, MessageId::new("msg-0"));

        let sends = transport.sends.lock().unwrap();
        assert_eq!(sends[0].0, "+15551234567@c.us");
        assert_eq!(sends[0].1, "hello");
    }

    #[tokio::test]
    async fn test_send_rejected_when_not_ready() {
        let transport = Arc::new(MockTransport::new());
        let gateway = SendGateway::new(
            transport.clone(),
            SessionTracker::new(),
            Arc::new(BroadcastHub::new()),
        );

        let result = gateway.send_message("+1", "hello").await;
        assert_eq!(result, Err(SendError::NotReady));
        assert!(transport.sends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_forwards_body_verbatim() {
        let transport = Arc::new(MockTransport::new());
        let gateway = SendGateway::new(
            transport.clone(),
            ready_session(),
            Arc::new(BroadcastHub::new()),
        );

        gateway
            .send_message("+15551234567", "  spaced  out  ")
            .await
            .unwrap();
        assert_eq!(transport.sends.lock().unwrap()[0].1, "  spaced  out  ");
    }

    #[tokio::test]
    async fn test_send_rejects_empty_input() {
        let gateway = SendGateway::new(
            Arc::new(MockTransport::new()),
            ready_session(),
            Arc::new(BroadcastHub::new()),
        );

        assert!(matches!(
            gateway.send_message("", "hello").await,
            Err(SendError::InvalidInput { .. })
        ));
        assert!(matches!(
            gateway.send_message("+1", "   ").await,
            Err(SendError::InvalidInput { .. })
        ));
    }
}
