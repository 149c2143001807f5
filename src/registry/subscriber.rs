//! Subscriber handle

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::store::SubscriberRegistry;
use crate::playback::Snapshot;

/// Registry-assigned subscriber identifier
///
/// Identifiers are never reused; a reconnecting viewer gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub(super) u64);

impl SubscriberId {
    /// Raw numeric id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// One attached viewer
///
/// Receives every snapshot the station broadcasts while it is registered.
/// Dropping the subscriber removes it from the registry.
pub struct Subscriber {
    id: SubscriberId,
    rx: mpsc::Receiver<Arc<Snapshot>>,
    registry: Arc<SubscriberRegistry>,
}

impl Subscriber {
    pub(super) fn new(
        id: SubscriberId,
        rx: mpsc::Receiver<Arc<Snapshot>>,
        registry: Arc<SubscriberRegistry>,
    ) -> Self {
        Self { id, rx, registry }
    }

    /// Subscriber id
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Check if the registry still delivers to this subscriber
    pub fn is_registered(&self) -> bool {
        self.registry.contains(self.id)
    }

    /// Wait for the next snapshot
    ///
    /// Returns `None` once the subscriber has been removed from the registry
    /// and its buffer is drained.
    pub async fn recv(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.recv().await
    }

    /// Take a buffered snapshot without waiting
    pub fn try_recv(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next snapshot or for `disconnected` to resolve
    ///
    /// On disconnect the subscriber unregisters itself and `None` is
    /// returned.
    pub async fn recv_until<F>(&mut self, disconnected: F) -> Option<Arc<Snapshot>>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            snapshot = self.rx.recv() => snapshot,
            _ = disconnected => {
                self.registry.unregister(self.id);
                None
            }
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}
