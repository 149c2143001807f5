//! Advancer: the timer loop that drives a station
//!
//! Exactly one advancer runs per station. Each tick moves the station to the
//! next item, then sleeps until that item's segment is over. Ticks never
//! overlap, so the segment on air always satisfies
//! `0 <= now - start < duration` until the next tick replaces it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::snapshot::Snapshot;
use crate::station::Station;

/// Timer loop for one station
pub struct Advancer {
    station: Arc<Station>,
    idle_poll_interval: Duration,
}

impl Advancer {
    /// Create an advancer using the station's idle poll interval
    pub fn new(station: Arc<Station>) -> Self {
        let idle_poll_interval = station.config().idle_poll_interval;
        Self {
            station,
            idle_poll_interval,
        }
    }

    /// Run one tick
    ///
    /// Advances the station and waits out the new segment, or waits one
    /// idle poll interval if there is nothing to play. Returns the snapshot
    /// that was on air during the wait.
    pub async fn tick(&self) -> Option<Arc<Snapshot>> {
        match self.station.advance() {
            Some(snapshot) => {
                tokio::time::sleep_until(snapshot.deadline()).await;
                Some(snapshot)
            }
            None => {
                tracing::trace!(
                    poll_ms = self.idle_poll_interval.as_millis() as u64,
                    "Playlist empty, waiting"
                );
                tokio::time::sleep(self.idle_poll_interval).await;
                None
            }
        }
    }

    /// Run the loop forever
    pub async fn run(self) {
        tracing::info!(
            items = self.station.store().len(),
            idle_poll_ms = self.idle_poll_interval.as_millis() as u64,
            "Advancer started"
        );

        let mut was_playing = false;
        loop {
            let playing = self.tick().await.is_some();
            if playing != was_playing {
                if playing {
                    tracing::info!("Station on air");
                } else {
                    tracing::info!("Station idle");
                }
                was_playing = playing;
            }
        }
    }

    /// Spawn the loop as a background task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
