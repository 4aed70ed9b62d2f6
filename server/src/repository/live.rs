//! Snapshot publisher shared by store implementations.

use tokio::sync::watch;

/// Pushes full collection snapshots to every live subscriber
pub struct SnapshotPublisher<T> {
    tx: watch::Sender<Vec<T>>,
}

impl<T> SnapshotPublisher<T> {
    pub fn new(initial: Vec<T>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the current snapshot. Succeeds even with no subscribers.
    pub fn publish(&self, snapshot: Vec<T>) {
        self.tx.send_replace(snapshot);
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.tx.subscribe()
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
