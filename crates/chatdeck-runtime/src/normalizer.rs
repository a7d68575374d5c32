//! Raw event normalization
//!
//! Translates loosely structured [`SessionEvent`]s from the transport into
//! the typed [`NormalizedEvent`] schema. Normalization is total: malformed
//! payloads are logged and dropped, they never crash the relay or reach
//! observers.

use serde_json::Value;
use tracing::warn;

use chatdeck_core::{
    strip_address_suffix, AckLevel, MessageId, NormalizedEvent, SessionEvent, Timestamp,
};

/// Raw timestamps below this are taken to be epoch seconds and scaled up.
/// The boundary (~year 5138 in seconds, ~1973 in millis) keeps both readings
/// unambiguous for any plausible wall clock.
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

// ----------------------------------------------------------------------------
// Event Normalizer
// ----------------------------------------------------------------------------

/// Stateless translator from raw session events to the normalized schema
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one raw event. Returns `None` for malformed payloads, which
    /// are logged and dropped.
    pub fn normalize(&self, event: &SessionEvent) -> Option<NormalizedEvent> {
        match event {
            SessionEvent::Qr { secret } => Some(NormalizedEvent::QrIssued {
                secret: secret.clone(),
            }),
            SessionEvent::Ready => Some(NormalizedEvent::StatusChanged {
                ready: true,
                message: "session connected".to_string(),
            }),
            SessionEvent::Disconnected { reason } => Some(NormalizedEvent::StatusChanged {
                ready: false,
                message: format!("session disconnected: {reason}"),
            }),
            SessionEvent::Message { payload } => self.normalize_message(payload),
            SessionEvent::AckUpdate { payload } => self.normalize_ack(payload),
        }
    }

    fn normalize_message(&self, payload: &Value) -> Option<NormalizedEvent> {
        let Some(chat_id) = payload.get("from").and_then(Value::as_str) else {
            warn!(?payload, "dropping message event without sender");
            return None;
        };
        let Some(body) = payload.get("body").and_then(Value::as_str) else {
            warn!(chat_id, "dropping message event without body");
            return None;
        };

        let from = strip_address_suffix(chat_id).to_string();
        let timestamp = coerce_timestamp(payload.get("timestamp"));

        // Messages echoed from the relayed account itself are outgoing.
        if payload.get("fromMe").and_then(Value::as_bool).unwrap_or(false) {
            let Some(id) = payload.get("id").and_then(Value::as_str) else {
                warn!(%from, "dropping outgoing message event without id");
                return None;
            };
            return Some(NormalizedEvent::MessageSent {
                from,
                body: body.to_string(),
                timestamp,
                message_id: MessageId::new(id),
            });
        }

        Some(NormalizedEvent::MessageReceived {
            from,
            body: body.to_string(),
            timestamp,
        })
    }

    fn normalize_ack(&self, payload: &Value) -> Option<NormalizedEvent> {
        let Some(id) = payload.get("id").and_then(Value::as_str) else {
            warn!(?payload, "dropping ack update without message id");
            return None;
        };
        let Some(raw_ack) = payload.get("ack").and_then(Value::as_i64) else {
            warn!(id, "dropping ack update without ack level");
            return None;
        };
        let Some(ack) = AckLevel::from_raw(raw_ack) else {
            warn!(id, raw_ack, "dropping ack update with out-of-range level");
            return None;
        };

        Some(NormalizedEvent::AckUpdated {
            message_id: MessageId::new(id),
            ack,
        })
    }
}

/// Coerce an upstream timestamp field to milliseconds. Seconds-resolution
/// values are scaled; missing or non-numeric values fall back to the relay
/// clock.
fn coerce_timestamp(raw: Option<&Value>) -> Timestamp {
    match raw.and_then(Value::as_u64) {
        Some(value) if value < MILLIS_THRESHOLD => Timestamp::from_millis(value * 1000),
        Some(value) => Timestamp::from_millis(value),
        None => Timestamp::now(),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lifecycle_events() {
        let normalizer = EventNormalizer::new();

        let qr = normalizer
            .normalize(&SessionEvent::Qr {
                secret: "pair".to_string(),
            })
            .unwrap();
        assert_eq!(
            qr,
            NormalizedEvent::QrIssued {
                secret: "pair".to_string()
            }
        );

        let ready = normalizer.normalize(&SessionEvent::Ready).unwrap();
        assert!(matches!(
            ready,
            NormalizedEvent::StatusChanged { ready: true, .. }
        ));

        let down = normalizer
            .normalize(&SessionEvent::Disconnected {
                reason: "logged out".to_string(),
            })
            .unwrap();
        if let NormalizedEvent::StatusChanged { ready, message } = down {
            assert!(!ready);
            assert!(message.contains("logged out"));
        } else {
            panic!("expected StatusChanged");
        }
    }

    #[test]
    fn test_incoming_message_strips_address_suffix() {
        let normalizer = EventNormalizer::new();
        let event = normalizer
            .normalize(&SessionEvent::Message {
                payload: json!({
                    "from": "+15551234567@c.us",
                    "body": "hello",
                    "timestamp": 1_700_000_000u64,
                }),
            })
            .unwrap();

        if let NormalizedEvent::MessageReceived {
            from,
            body,
            timestamp,
        } = event
        {
            assert_eq!(from, "+15551234567");
            assert_eq!(body, "hello");
            assert_eq!(timestamp.as_millis(), 1_700_000_000_000);
        } else {
            panic!("expected MessageReceived");
        }
    }

    #[test]
    fn test_millisecond_timestamps_pass_through() {
        let normalizer = EventNormalizer::new();
        let event = normalizer
            .normalize(&SessionEvent::Message {
                payload: json!({
                    "from": "+1@c.us",
                    "body": "x",
                    "timestamp": 1_700_000_000_000u64,
                }),
            })
            .unwrap();
        if let NormalizedEvent::MessageReceived { timestamp, .. } = event {
            assert_eq!(timestamp.as_millis(), 1_700_000_000_000);
        } else {
            panic!("expected MessageReceived");
        }
    }

    #[test]
    fn test_missing_timestamp_uses_relay_clock() {
        let normalizer = EventNormalizer::new();
        let before = Timestamp::now().as_millis();
        let event = normalizer
            .normalize(&SessionEvent::Message {
                payload: json!({ "from": "+1@c.us", "body": "x" }),
            })
            .unwrap();
        if let NormalizedEvent::MessageReceived { timestamp, .. } = event {
            assert!(timestamp.as_millis() >= before);
        } else {
            panic!("expected MessageReceived");
        }
    }

    #[test]
    fn test_echoed_message_becomes_outgoing() {
        let normalizer = EventNormalizer::new();
        let event = normalizer
            .normalize(&SessionEvent::Message {
                payload: json!({
                    "from": "+15557654321@c.us",
                    "body": "sent elsewhere",
                    "fromMe": true,
                    "id": "msg-7",
                    "timestamp": 1_700_000_000u64,
                }),
            })
            .unwrap();
        assert!(matches!(event, NormalizedEvent::MessageSent { .. }));
    }

    #[test]
    fn test_malformed_message_dropped() {
        let normalizer = EventNormalizer::new();
        assert!(normalizer
            .normalize(&SessionEvent::Message {
                payload: json!({ "body": "no sender" }),
            })
            .is_none());
        assert!(normalizer
            .normalize(&SessionEvent::Message {
                payload: json!({ "from": "+1@c.us" }),
            })
            .is_none());
        assert!(normalizer
            .normalize(&SessionEvent::Message {
                payload: json!("not an object"),
            })
            .is_none());
    }

    #[test]
    fn test_ack_update() {
        let normalizer = EventNormalizer::new();
        let event = normalizer
            .normalize(&SessionEvent::AckUpdate {
                payload: json!({ "id": "msg-7", "ack": 2 }),
            })
            .unwrap();
        assert_eq!(
            event,
            NormalizedEvent::AckUpdated {
                message_id: MessageId::new("msg-7"),
                ack: AckLevel::Delivered,
            }
        );
    }

    #[test]
    fn test_out_of_range_ack_dropped() {
        let normalizer = EventNormalizer::new();
        assert!(normalizer
            .normalize(&SessionEvent::AckUpdate {
                payload: json!({ "id": "msg-7", "ack": 9 }),
            })
            .is_none());
        assert!(normalizer
            .normalize(&SessionEvent::AckUpdate {
                payload: json!({ "id": "msg-7" }),
            })
            .is_none());
    }
}
