//! Realtime fan-out of dispatch events.
//!
//! [`Broadcaster`] is a thin wrapper over a [`tokio::sync::broadcast`]
//! channel. Every connected subscriber gets every event emitted after it
//! subscribed, in emission order. There is no replay: a subscriber that
//! connects late must fetch the current lists itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use siren_types::RealtimeEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Default capacity of the realtime channel.
///
/// A subscriber that falls behind by more than this many events gets a
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Shared publish point for realtime events.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<RealtimeEvent>,
    connections: Arc<AtomicUsize>,
}

impl Broadcaster {
    /// Create a broadcaster whose subscribers buffer up to `capacity`
    /// events.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }

    /// Push an event to every current subscriber.
    ///
    /// Returns the number of subscribers that received it. With nobody
    /// listening this is a no-op that returns 0.
    pub fn emit(&self, event: RealtimeEvent) -> usize {
        let name = event.name();
        // send only fails when there are zero receivers.
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(event = name, delivered, "Realtime event emitted");
        delivered
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Record a realtime client connecting.
    pub fn connected(&self, connection: &str) {
        let open = self
            .connections
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1);
        info!(connection, open, "Realtime client connected");
    }

    /// Record a realtime client disconnecting.
    pub fn disconnected(&self, connection: &str) {
        let open = self
            .connections
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1);
        info!(connection, open, "Realtime client disconnected");
    }

    /// Number of realtime clients currently connected.
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use siren_types::RouteId;

    use super::*;

    fn deleted(id: u64) -> RealtimeEvent {
        RealtimeEvent::EmergencyRouteDeleted {
            id: RouteId::new(id),
        }
    }

    #[test]
    fn emit_without_subscribers_is_noop() {
        let broadcaster = Broadcaster::default();
        assert_eq!(broadcaster.emit(deleted(1)), 0);
    }

    #[tokio::test]
    async fn every_subscriber_gets_events_in_order() {
        let broadcaster = Broadcaster::default();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        assert_eq!(broadcaster.emit(deleted(1)), 2);
        assert_eq!(broadcaster.emit(deleted(2)), 2);

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await.ok(), Some(deleted(1)));
            assert_eq!(rx.recv().await.ok(), Some(deleted(2)));
        }
    }

    #[tokio::test]
    async fn late_subscriber_sees_no_replay() {
        let broadcaster = Broadcaster::default();
        let _early = broadcaster.subscribe();
        broadcaster.emit(deleted(1));

        let mut late = broadcaster.subscribe();
        broadcaster.emit(deleted(2));
        assert_eq!(late.recv().await.ok(), Some(deleted(2)));
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn connection_bookkeeping() {
        let broadcaster = Broadcaster::default();
        broadcaster.connected("a");
        broadcaster.connected("b");
        broadcaster.disconnected("a");
        assert_eq!(broadcaster.connection_count(), 1);
    }
}
