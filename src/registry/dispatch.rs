//! Broadcast fan-out
//!
//! Delivery is a `try_send` per subscriber: it either lands in the
//! subscriber's buffer immediately or the overflow policy decides what
//! happens to that subscriber. Nothing here waits on a viewer.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::config::OverflowPolicy;
use super::store::SubscriberRegistry;
use crate::playback::Snapshot;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Snapshot queued for the subscriber
    Delivered,
    /// Subscriber buffer full, update skipped
    Dropped,
    /// Subscriber gone or evicted; remove it
    Disconnected,
}

/// Per-broadcast delivery counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub dropped: usize,
    pub disconnected: usize,
}

impl DispatchReport {
    /// Subscribers the broadcast was attempted for
    pub fn attempted(&self) -> usize {
        self.delivered + self.dropped + self.disconnected
    }

    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered => self.delivered += 1,
            Delivery::Dropped => self.dropped += 1,
            Delivery::Disconnected => self.disconnected += 1,
        }
    }
}

/// Attempt to hand `snapshot` to one subscriber without waiting
pub fn deliver(
    tx: &mpsc::Sender<Arc<Snapshot>>,
    snapshot: &Arc<Snapshot>,
    policy: OverflowPolicy,
) -> Delivery {
    match tx.try_send(Arc::clone(snapshot)) {
        Ok(()) => Delivery::Delivered,
        Err(TrySendError::Full(_)) => match policy {
            OverflowPolicy::DropUpdate => Delivery::Dropped,
            OverflowPolicy::Disconnect => Delivery::Disconnected,
        },
        Err(TrySendError::Closed(_)) => Delivery::Disconnected,
    }
}

impl SubscriberRegistry {
    /// Send a snapshot to every registered subscriber
    ///
    /// Every subscriber registered when the sweep starts is attempted before
    /// this returns. Subscribers that are closed, or full under
    /// [`OverflowPolicy::Disconnect`], are removed.
    pub fn broadcast(&self, snapshot: &Arc<Snapshot>) -> DispatchReport {
        let policy = self.config().overflow;
        let mut report = DispatchReport::default();

        self.for_each(|id, tx| {
            let delivery = deliver(tx, snapshot, policy);
            if delivery == Delivery::Dropped {
                tracing::debug!(subscriber = %id, index = snapshot.index, "Subscriber lagging, update dropped");
            }
            report.record(delivery);
            delivery
        });

        self.broadcasts.fetch_add(1, Ordering::Relaxed);

        if report.dropped > 0 || report.disconnected > 0 {
            tracing::warn!(
                index = snapshot.index,
                delivered = report.delivered,
                dropped = report.dropped,
                disconnected = report.disconnected,
                "Broadcast partially delivered"
            );
        }

        report
    }
}
