//! # chatdeck-runtime
//!
//! The relay engine: normalizes raw session events, tracks the session
//! lifecycle, fans events out to dashboard observers, executes the prefix
//! command language, and owns the validated outbound send path.
//!
//! Embedding applications build a relay with [`RuntimeBuilder`], feed raw
//! [`chatdeck_core::SessionEvent`]s through the handle's event sender, and
//! register [`chatdeck_core::ObserverSink`]s for broadcast delivery.

pub mod builder;
pub mod dispatcher;
pub mod gateway;
pub mod hub;
pub mod normalizer;
pub mod session;
pub mod task;

// ----------------------------------------------------------------------------
// Public API Re-exports
// ----------------------------------------------------------------------------

pub use builder::{create_test_runtime, RuntimeBuilder, RuntimeHandle, StatusReport};
pub use dispatcher::CommandDispatcher;
pub use gateway::{SendGateway, SentMessage};
pub use hub::{BroadcastHub, BroadcastStatistics, ObserverId};
pub use normalizer::EventNormalizer;
pub use session::SessionTracker;
pub use task::{RelayStats, RelayStatsHandle, RelayTask};
