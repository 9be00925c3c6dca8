//! Watch event fan-out.
//!
//! Events are broadcast over a bounded channel; a consumer that falls behind
//! lags and loses the oldest events rather than blocking the writer.

use tokio::sync::broadcast;

/// The verb a watch event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Added,
    Modified,
    Deleted,
}

/// One watch event carrying the object after the verb applied.
#[derive(Debug, Clone)]
pub struct WatchEvent<K> {
    pub event_type: EventType,
    pub object: K,
}

const CHANNEL_CAPACITY: usize = 256;

/// Per-kind broadcaster feeding every active watch of that kind.
pub struct WatchBroadcaster<K> {
    tx: broadcast::Sender<WatchEvent<K>>,
}

impl<K: Clone> WatchBroadcaster<K> {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Opens a new watch subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent<K>> {
        self.tx.subscribe()
    }

    /// Publishes an event. With no active watchers this is a no-op.
    pub fn broadcast(&self, event_type: EventType, object: K) {
        let _ = self.tx.send(WatchEvent { event_type, object });
    }

    /// Number of active subscriptions.
    pub fn watcher_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<K: Clone> Default for WatchBroadcaster<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let broadcaster = WatchBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.broadcast(EventType::Added, "a".to_string());
        broadcaster.broadcast(EventType::Deleted, "b".to_string());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::Added);
        assert_eq!(first.object, "a");
        let second = rx.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Deleted);
    }

    #[tokio::test]
    async fn test_broadcast_without_watchers_does_not_block() {
        let broadcaster: WatchBroadcaster<String> = WatchBroadcaster::new();
        broadcaster.broadcast(EventType::Added, "lost".to_string());
        assert_eq!(broadcaster.watcher_count(), 0);
    }
}
