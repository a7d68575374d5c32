//! The relay event loop

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use chatdeck_core::{EventReceiver, NormalizedEvent, SessionEvent};

use crate::dispatcher::CommandDispatcher;
use crate::hub::BroadcastHub;
use crate::normalizer::EventNormalizer;
use crate::session::SessionTracker;

// ----------------------------------------------------------------------------
// Relay Statistics
// ----------------------------------------------------------------------------

/// Snapshot of the relay loop counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStats {
    pub events_received: u64,
    pub events_relayed: u64,
    pub events_dropped: u64,
}

/// Shared counters the relay task writes and the runtime handle reads
#[derive(Debug, Default)]
pub struct RelayStatsHandle {
    events_received: AtomicU64,
    events_relayed: AtomicU64,
    events_dropped: AtomicU64,
}

impl RelayStatsHandle {
    /// Consistent-enough snapshot for reporting
    pub fn snapshot(&self) -> RelayStats {
        RelayStats {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_relayed: self.events_relayed.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }
}

// ----------------------------------------------------------------------------
// Relay Task
// ----------------------------------------------------------------------------

/// The single event-loop task at the heart of the relay.
///
/// Receives raw session events, normalizes them, advances the session state
/// machine, broadcasts to observers, and hands inbound messages to the
/// command dispatcher. Command execution is spawned so a slow transport
/// reply never stalls the loop.
pub struct RelayTask {
    event_receiver: EventReceiver,
    normalizer: EventNormalizer,
    session: SessionTracker,
    hub: Arc<BroadcastHub>,
    dispatcher: Arc<CommandDispatcher>,
    stats: Arc<RelayStatsHandle>,
    running: bool,
}

impl RelayTask {
    pub fn new(
        event_receiver: EventReceiver,
        session: SessionTracker,
        hub: Arc<BroadcastHub>,
        dispatcher: Arc<CommandDispatcher>,
    ) -> Self {
        Self {
            event_receiver,
            normalizer: EventNormalizer::new(),
            session,
            hub,
            dispatcher,
            stats: Arc::new(RelayStatsHandle::default()),
            running: false,
        }
    }

    /// Shared counter handle, for readers that outlive the spawned task
    pub fn stats(&self) -> Arc<RelayStatsHandle> {
        Arc::clone(&self.stats)
    }

    /// Run until the event channel closes
    pub async fn run(&mut self) {
        self.running = true;
        info!("relay task started");

        while self.running {
            match self.event_receiver.recv().await {
                Some(event) => {
                    self.stats.events_received.fetch_add(1, Ordering::Relaxed);
                    self.process_event(event).await;
                }
                None => {
                    info!("event channel closed, relay task stopping");
                    self.running = false;
                }
            }
        }

        let stats = self.stats.snapshot();
        info!(
            received = stats.events_received,
            relayed = stats.events_relayed,
            dropped = stats.events_dropped,
            "relay task stopped"
        );
    }

    async fn process_event(&mut self, raw: SessionEvent) {
        let Some(event) = self.normalizer.normalize(&raw) else {
            self.stats.events_dropped.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let state = self.session.apply_event(&event);
        debug!(%event, %state, "event normalized");

        self.hub.broadcast(&event).await;
        self.stats.events_relayed.fetch_add(1, Ordering::Relaxed);

        if matches!(event, NormalizedEvent::MessageReceived { .. }) {
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                if let Err(err) = dispatcher.dispatch(&event).await {
                    warn!(%err, "command dispatch failed");
                }
            });
        }
    }
}
