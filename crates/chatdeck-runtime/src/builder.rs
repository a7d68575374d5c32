//! Runtime assembly and lifecycle
//!
//! [`RuntimeBuilder`] wires the normalizer, session tracker, broadcast hub,
//! send gateway, command dispatcher, and relay task together and spawns the
//! loop. [`RuntimeHandle`] is the embedding application's surface: feed raw
//! events in, register observers, send messages, query status, shut down.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use chatdeck_core::{
    create_event_channel, ChatSummary, ChatdeckConfig, EventSender, MessageId, ObserverSink,
    RelayError, RelayResult, SendError, SessionState, SessionTransport, Timestamp,
};

use crate::dispatcher::CommandDispatcher;
use crate::gateway::SendGateway;
use crate::hub::{BroadcastHub, ObserverId};
use crate::session::SessionTracker;
use crate::task::{RelayStats, RelayStatsHandle, RelayTask};

// ----------------------------------------------------------------------------
// Runtime Builder
// ----------------------------------------------------------------------------

/// Builder for a running relay
pub struct RuntimeBuilder {
    transport: Arc<dyn SessionTransport>,
    config: ChatdeckConfig,
}

impl RuntimeBuilder {
    pub fn new(transport: Arc<dyn SessionTransport>) -> Self {
        Self {
            transport,
            config: ChatdeckConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChatdeckConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration, wire the components, and spawn the relay
    /// task
    pub fn build_and_start(self) -> RelayResult<RuntimeHandle> {
        self.config
            .validate()
            .map_err(RelayError::config_error)?;

        let config = Arc::new(self.config);
        let (event_sender, event_receiver) = create_event_channel(&config.channels);

        let session = SessionTracker::new();
        let hub = Arc::new(BroadcastHub::new());
        let gateway = Arc::new(SendGateway::new(
            Arc::clone(&self.transport),
            session.clone(),
            Arc::clone(&hub),
        ));
        let dispatcher = Arc::new(CommandDispatcher::new(
            Arc::clone(&config),
            Arc::clone(&self.transport),
            Arc::clone(&gateway),
            Arc::clone(&hub),
        ));

        let mut task = RelayTask::new(event_receiver, session.clone(), Arc::clone(&hub), dispatcher);
        let stats = task.stats();
        let task_handle = tokio::spawn(async move { task.run().await });

        info!("relay runtime started");

        Ok(RuntimeHandle {
            config,
            transport: self.transport,
            event_sender,
            session,
            hub,
            gateway,
            stats,
            task_handle: Some(task_handle),
        })
    }
}

// ----------------------------------------------------------------------------
// Runtime Handle
// ----------------------------------------------------------------------------

/// Snapshot of the relay's session status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub ready: bool,
    pub state: SessionState,
    pub timestamp: Timestamp,
}

/// Handle to a running relay
pub struct RuntimeHandle {
    config: Arc<ChatdeckConfig>,
    transport: Arc<dyn SessionTransport>,
    event_sender: EventSender,
    session: SessionTracker,
    hub: Arc<BroadcastHub>,
    gateway: Arc<SendGateway>,
    stats: Arc<RelayStatsHandle>,
    task_handle: Option<JoinHandle<()>>,
}

impl RuntimeHandle {
    /// Sender the session transport feeds raw events into
    pub fn event_sender(&self) -> EventSender {
        self.event_sender.clone()
    }

    /// Register a dashboard observer
    pub fn observer_joined(&self, sink: Arc<dyn ObserverSink>) -> ObserverId {
        self.hub.observer_joined(sink)
    }

    /// Remove a dashboard observer
    pub fn observer_left(&self, id: ObserverId) {
        self.hub.observer_left(id)
    }

    /// Number of connected observers
    pub fn observer_count(&self) -> usize {
        self.hub.observer_count()
    }

    /// Send a text message through the relayed session
    pub async fn send_message(
        &self,
        recipient: &str,
        body: &str,
    ) -> Result<MessageId, SendError> {
        let sent = self.gateway.send_message(recipient, body).await?;
        Ok(sent.message_id)
    }

    /// Current session status
    pub fn status(&self) -> StatusReport {
        let state = self.session.current_state();
        StatusReport {
            ready: state.is_ready(),
            state,
            timestamp: Timestamp::now(),
        }
    }

    /// List recent conversations. `limit` defaults to the configured
    /// contacts limit. Requires a ready session.
    pub async fn list_contacts(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ChatSummary>, RelayError> {
        if !self.session.is_ready() {
            return Err(RelayError::NotReady);
        }
        let limit = limit.unwrap_or(self.config.contacts_limit);
        Ok(self.transport.list_recent_chats(limit).await?)
    }

    /// Counters from the relay loop
    pub fn relay_stats(&self) -> RelayStats {
        self.stats.snapshot()
    }

    /// Whether the relay task is still running
    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stop the relay task
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
            let _ = handle.await;
            info!("relay runtime shut down");
        }
    }
}

// ----------------------------------------------------------------------------
// Test Helpers
// ----------------------------------------------------------------------------

/// Build a running relay with testing configuration
pub fn create_test_runtime(transport: Arc<dyn SessionTransport>) -> RelayResult<RuntimeHandle> {
    RuntimeBuilder::new(transport)
        .with_config(ChatdeckConfig::testing())
        .build_and_start()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
