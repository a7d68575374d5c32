//! Core types for the chatdeck relay
//!
//! This module defines the fundamental types used throughout the relay,
//! using newtype patterns for semantic validation and type safety.

use serde::{Deserialize, Serialize};
use std::fmt;

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Millisecond timestamp since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from raw milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Get current wall-clock timestamp
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as u64)
    }

    /// Get the raw milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Message Identifier
// ----------------------------------------------------------------------------

/// Opaque upstream identifier for a message, used to correlate ack updates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ----------------------------------------------------------------------------
// Acknowledgement Level
// ----------------------------------------------------------------------------

/// Delivery acknowledgement level for an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum AckLevel {
    /// Accepted by the relay, not yet confirmed by the upstream network
    Pending = 0,
    /// Confirmed sent by the upstream network
    Sent = 1,
    /// Delivered to the recipient's device
    Delivered = 2,
    /// Read by the recipient
    Read = 3,
}

impl AckLevel {
    /// Decode an upstream ack integer. Values outside the known range are
    /// rejected rather than clamped.
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Sent),
            2 => Some(Self::Delivered),
            3 => Some(Self::Read),
            _ => None,
        }
    }

    /// Get the wire integer for this level
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for AckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        };
        write!(f, "{name}")
    }
}

// ----------------------------------------------------------------------------
// Message Direction
// ----------------------------------------------------------------------------

/// Direction of a message relative to the relayed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    /// Wire string used in broadcast payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ----------------------------------------------------------------------------
// Contact and Chat Summaries
// ----------------------------------------------------------------------------

/// Profile details for a contact, as reported by the session transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Self-reported display name, if the contact set one
    pub display_name: Option<String>,
    /// Whether the account is registered as a business account
    pub is_business: bool,
}

/// Summary of one conversation, as reported by the session transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Upstream chat identifier
    pub id: String,
    /// Conversation display name
    pub name: String,
    /// Whether this is a group conversation
    pub is_group: bool,
    /// Number of unread messages
    pub unread_count: u32,
}

// ----------------------------------------------------------------------------
// Chat Addressing
// ----------------------------------------------------------------------------

/// Suffix the upstream network appends to individual chat identifiers
pub const CHAT_ADDRESS_SUFFIX: &str = "@c.us";

/// Canonicalize a recipient phone number by ensuring a leading `+`.
///
/// Digits and formatting are passed through untouched; validation beyond the
/// prefix is the upstream network's job.
pub fn canonical_number(raw: &str) -> String {
    if raw.starts_with('+') {
        raw.to_string()
    } else {
        format!("+{raw}")
    }
}

/// Build the upstream chat identifier for a canonical number
pub fn chat_identifier(number: &str) -> String {
    format!("{number}{CHAT_ADDRESS_SUFFIX}")
}

/// Strip the network address suffix from a chat identifier, yielding the
/// bare sender number. Identifiers without a suffix pass through unchanged.
pub fn strip_address_suffix(chat_id: &str) -> &str {
    match chat_id.find('@') {
        Some(idx) => &chat_id[..idx],
        None => chat_id,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
