//! Subscriber registry implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::config::RegistryConfig;
use super::dispatch::Delivery;
use super::subscriber::{Subscriber, SubscriberId};
use crate::playback::Snapshot;

/// Set of attached viewers
///
/// Registration, removal and iteration each take the internal lock for a
/// short synchronous section, so callers never need locking of their own.
pub struct SubscriberRegistry {
    /// Delivery channel per subscriber
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Arc<Snapshot>>>>,

    /// Next subscriber id
    next_id: AtomicU64,

    /// Broadcasts dispatched so far
    pub(super) broadcasts: AtomicU64,

    /// Configuration
    config: RegistryConfig,
}

impl SubscriberRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            broadcasts: AtomicU64::new(0),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a new subscriber
    ///
    /// When `initial` is set, it is the first snapshot the subscriber
    /// receives, ahead of any later broadcast.
    pub fn register(self: &Arc<Self>, initial: Option<Arc<Snapshot>>) -> Subscriber {
        let (tx, rx) = mpsc::channel(self.config.subscriber_buffer.max(1));
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        if let Some(snapshot) = initial {
            // Fresh channel with at least one slot
            if tx.try_send(snapshot).is_err() {
                tracing::warn!(subscriber = %id, "Failed to queue resync snapshot");
            }
        }

        let count = {
            let mut subscribers = self.subscribers.lock();
            subscribers.insert(id, tx);
            subscribers.len()
        };

        tracing::info!(subscriber = %id, subscribers = count, "Subscriber registered");

        Subscriber::new(id, rx, Arc::clone(self))
    }

    /// Remove a subscriber
    ///
    /// Safe to call any number of times. Returns `true` if the subscriber
    /// was registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let (removed, remaining) = {
            let mut subscribers = self.subscribers.lock();
            let removed = subscribers.remove(&id).is_some();
            (removed, subscribers.len())
        };

        if removed {
            tracing::info!(subscriber = %id, subscribers = remaining, "Subscriber removed");
        }

        removed
    }

    /// Check if a subscriber is registered
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().contains_key(&id)
    }

    /// Visit every registered subscriber
    ///
    /// Subscribers for which `f` returns [`Delivery::Disconnected`] are
    /// removed. `f` runs under the registry lock and must not block.
    /// Subscribers removed before the sweep reaches them are not visited.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(SubscriberId, &mpsc::Sender<Arc<Snapshot>>) -> Delivery,
    {
        let mut subscribers = self.subscribers.lock();

        subscribers.retain(|id, tx| match f(*id, tx) {
            Delivery::Delivered | Delivery::Dropped => true,
            Delivery::Disconnected => {
                tracing::debug!(subscriber = %id, "Subscriber disconnected during dispatch");
                false
            }
        });
    }

    /// Ids of the registered subscribers, in registration order
    pub fn ids(&self) -> Vec<SubscriberId> {
        let mut ids: Vec<_> = self.subscribers.lock().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            subscriber_count: self.subscriber_count(),
            total_registered: self.next_id.load(Ordering::Relaxed) - 1,
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
        }
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Currently registered subscribers
    pub subscriber_count: usize,
    /// Subscribers ever registered
    pub total_registered: u64,
    /// Broadcasts dispatched
    pub broadcasts: u64,
}
