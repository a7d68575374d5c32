//! Observer registry and event fan-out

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use chatdeck_core::{NormalizedEvent, ObserverSink};

/// Unique identifier for a connected observer
pub type ObserverId = Uuid;

// ----------------------------------------------------------------------------
// Broadcast Statistics
// ----------------------------------------------------------------------------

/// Counters for hub activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastStatistics {
    pub broadcasts: u64,
    pub deliveries: u64,
    pub failed_deliveries: u64,
}

// ----------------------------------------------------------------------------
// Broadcast Hub
// ----------------------------------------------------------------------------

/// Registry of connected observers with sequential event fan-out.
///
/// A failed delivery is logged and counted but never evicts the observer;
/// removal happens through [`BroadcastHub::observer_left`] when the
/// observer's connection actually drops.
pub struct BroadcastHub {
    observers: DashMap<ObserverId, Arc<dyn ObserverSink>>,
    broadcasts: AtomicU64,
    deliveries: AtomicU64,
    failed_deliveries: AtomicU64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            observers: DashMap::new(),
            broadcasts: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            failed_deliveries: AtomicU64::new(0),
        }
    }

    /// Register a new observer and return its id
    pub fn observer_joined(&self, sink: Arc<dyn ObserverSink>) -> ObserverId {
        let id = Uuid::new_v4();
        self.observers.insert(id, sink);
        info!(observer_id = %id, count = self.observers.len(), "observer joined");
        id
    }

    /// Remove an observer from the registry
    pub fn observer_left(&self, id: ObserverId) {
        if self.observers.remove(&id).is_some() {
            info!(observer_id = %id, count = self.observers.len(), "observer left");
        }
    }

    /// Number of currently registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Activity counters
    pub fn statistics(&self) -> BroadcastStatistics {
        BroadcastStatistics {
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            failed_deliveries: self.failed_deliveries.load(Ordering::Relaxed),
        }
    }

    /// Deliver one event to every registered observer.
    ///
    /// Delivery is sequential per broadcast so each observer sees events in
    /// the order the relay produced them. Failures are isolated per observer.
    pub async fn broadcast(&self, event: &NormalizedEvent) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);

        let event_name = event.event_name();
        let payload = event.payload();

        // Snapshot the registry so a join or leave during delivery cannot
        // deadlock against the map.
        let targets: Vec<(ObserverId, Arc<dyn ObserverSink>)> = self
            .observers
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        debug!(event = %event, observers = targets.len(), "broadcasting");

        for (id, sink) in targets {
            match sink.deliver(event_name, &payload).await {
                Ok(()) => {
                    self.deliveries.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    self.failed_deliveries.fetch_add(1, Ordering::Relaxed);
                    warn!(observer_id = %id, %err, event_name, "observer delivery failed");
                }
            }
        }
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
