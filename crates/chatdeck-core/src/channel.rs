//! Typed channel plumbing between the session transport and the relay task

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::ChannelConfig;
use crate::events::SessionEvent;

// ----------------------------------------------------------------------------
// Channel Type Aliases
// ----------------------------------------------------------------------------

/// Sender half of the raw session event stream
pub type EventSender = mpsc::Sender<SessionEvent>;

/// Receiver half of the raw session event stream
pub type EventReceiver = mpsc::Receiver<SessionEvent>;

/// Create the bounded session event channel
pub fn create_event_channel(config: &ChannelConfig) -> (EventSender, EventReceiver) {
    mpsc::channel(config.event_buffer_size)
}

// ----------------------------------------------------------------------------
// Channel Errors
// ----------------------------------------------------------------------------

/// Failure modes of the internal channels
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel buffer is full
    #[error("channel is full")]
    ChannelFull,

    /// The receiving task has shut down
    #[error("channel is closed")]
    ChannelClosed,
}

// ----------------------------------------------------------------------------
// Non-Blocking Send
// ----------------------------------------------------------------------------

/// Non-blocking send for producers that must not stall on backpressure
pub trait NonBlockingSend<T> {
    fn send_or_drop(&self, item: T) -> Result<(), ChannelError>;
}

impl NonBlockingSend<SessionEvent> for EventSender {
    fn send_or_drop(&self, item: SessionEvent) -> Result<(), ChannelError> {
        self.try_send(item).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => ChannelError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => ChannelError::ChannelClosed,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_channel_round_trip() {
        let config = ChannelConfig::testing();
        let (sender, mut receiver) = create_event_channel(&config);

        sender.send(SessionEvent::Ready).await.unwrap();
        let received = receiver.recv().await.unwrap();
        assert_eq!(received, SessionEvent::Ready);
    }

    #[tokio::test]
    async fn test_send_or_drop_reports_full() {
        let config = ChannelConfig {
            event_buffer_size: 1,
        };
        let (sender, _receiver) = create_event_channel(&config);

        assert!(sender.send_or_drop(SessionEvent::Ready).is_ok());
        assert_eq!(
            sender.send_or_drop(SessionEvent::Ready),
            Err(ChannelError::ChannelFull)
        );
    }

    #[tokio::test]
    async fn test_send_or_drop_reports_closed() {
        let config = ChannelConfig::testing();
        let (sender, receiver) = create_event_channel(&config);
        drop(receiver);

        assert_eq!(
            sender.send_or_drop(SessionEvent::Ready),
            Err(ChannelError::ChannelClosed)
        );
    }
}
