//! # chatdeck-core
//!
//! Stable data model and interfaces for the chatdeck relay: the event
//! schema, session lifecycle state machine, prefix command grammar, error
//! taxonomy, configuration, channel plumbing, and the transport/observer
//! trait seams the runtime is generic over.
//!
//! The engine that drives these types lives in `chatdeck-runtime`.

pub mod channel;
pub mod command;
pub mod config;
pub mod errors;
pub mod events;
pub mod session;
pub mod transport;
pub mod types;

// ----------------------------------------------------------------------------
// Public API Re-exports
// ----------------------------------------------------------------------------

pub use channel::{create_event_channel, ChannelError, EventReceiver, EventSender, NonBlockingSend};
pub use command::{parse_command, Command};
pub use config::{ChannelConfig, ChatdeckConfig, CommandConfig};
pub use errors::{DeliveryError, RelayError, RelayResult, SendError, TransportError};
pub use events::{NormalizedEvent, SessionEvent};
pub use session::{AuditEntry, SessionState, SessionStateMachine};
pub use transport::{ObserverSink, SessionTransport};
pub use types::{
    canonical_number, chat_identifier, strip_address_suffix, AckLevel, ChatSummary, ContactInfo,
    Direction, MessageId, Timestamp, CHAT_ADDRESS_SUFFIX,
};
