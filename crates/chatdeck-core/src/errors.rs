//! Error taxonomy for the relay
//!
//! Each boundary gets its own error enum: `SendError` for the outbound send
//! path, `TransportError` for the session transport seam, `DeliveryError`
//! for observer delivery, and `RelayError` as the top-level type the runtime
//! surfaces through its handle.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Outbound Send Errors
// ----------------------------------------------------------------------------

/// Failure of a validated outbound send request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    /// The session is not in the Ready state
    #[error("session is not ready to send")]
    NotReady,

    /// The request failed validation before reaching the transport
    #[error("invalid send request: {reason}")]
    InvalidInput { reason: String },

    /// The transport accepted the request but failed to execute it
    #[error("transport failure: {reason}")]
    TransportFailure { reason: String },
}

impl SendError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Session Transport Errors
// ----------------------------------------------------------------------------

/// Failure at the session transport seam
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Sending a message through the upstream session failed
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// Fetching contact or chat data from the upstream session failed
    #[error("failed to fetch data: {0}")]
    FetchFailed(String),

    /// The upstream session is not connected
    #[error("session transport is not connected")]
    NotConnected,
}

impl From<TransportError> for SendError {
    fn from(err: TransportError) -> Self {
        Self::TransportFailure {
            reason: err.to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Observer Delivery Errors
// ----------------------------------------------------------------------------

/// Failure to deliver a broadcast event to one observer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("observer delivery failed: {reason}")]
pub struct DeliveryError {
    pub reason: String,
}

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Top-Level Relay Errors
// ----------------------------------------------------------------------------

/// Top-level error surfaced by the runtime handle
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The session is not in the Ready state
    #[error("session is not ready")]
    NotReady,

    /// Session transport failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Internal channel failure
    #[error("channel error: {message}")]
    Channel { message: String },

    /// Invalid runtime configuration
    #[error("configuration error: {reason}")]
    Configuration { reason: String },
}

impl RelayError {
    pub fn channel_error(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    pub fn config_error(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Convenience result type used throughout the relay
pub type RelayResult<T> = Result<T, RelayError>;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts_to_send_error() {
        let err: SendError = TransportError::SendFailed("socket closed".to_string()).into();
        assert!(matches!(err, SendError::TransportFailure { .. }));
        assert!(err.to_string().contains("socket closed"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(SendError::NotReady.to_string(), "session is not ready to send");
        assert_eq!(
            SendError::invalid_input("empty body").to_string(),
            "invalid send request: empty body"
        );
        assert_eq!(
            RelayError::config_error("buffer size must be nonzero").to_string(),
            "configuration error: buffer size must be nonzero"
        );
    }
}
