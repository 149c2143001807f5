//! Station implementation

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;

use super::config::StationConfig;
use crate::playback::{Advancer, PlaybackState, Segment, Snapshot};
use crate::playlist::{PlaylistEntry, PlaylistError, PlaylistStore};
use crate::registry::{Subscriber, SubscriberRegistry};

/// One synchronized broadcast channel
pub struct Station {
    /// Playable items
    store: Arc<PlaylistStore>,

    /// Segment on air; replaced as a whole on every advancement
    state: RwLock<PlaybackState>,

    /// Attached viewers
    registry: Arc<SubscriberRegistry>,

    /// Configuration
    config: StationConfig,
}

/// Full playlist dump with the index on air
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistListing {
    pub videos: Vec<PlaylistEntry>,
    /// `None` while the station is idle
    pub current_index: Option<usize>,
}

impl Station {
    /// Create a station with an empty playlist
    pub fn new(config: StationConfig) -> Self {
        Self::with_store(config, Arc::new(PlaylistStore::new()))
    }

    /// Create a station around an existing playlist store
    pub fn with_store(config: StationConfig, store: Arc<PlaylistStore>) -> Self {
        Self {
            store,
            state: RwLock::new(PlaybackState::Idle),
            registry: Arc::new(SubscriberRegistry::with_config(config.registry.clone())),
            config,
        }
    }

    /// Get the station configuration
    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Playlist store
    pub fn store(&self) -> &Arc<PlaylistStore> {
        &self.store
    }

    /// Subscriber registry
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        *self.state.read()
    }

    /// Attach a viewer
    ///
    /// If something is on air, the returned subscriber already holds the
    /// current snapshot, so the viewer can seek to `now - start_time`
    /// without waiting for the next advancement.
    pub fn subscribe(&self) -> Subscriber {
        let state = self.state.read();
        let snapshot = self.snapshot_of(&state);
        self.registry.register(snapshot)
    }

    /// Snapshot of the item on air, if any
    pub fn now_playing(&self) -> Option<Arc<Snapshot>> {
        let state = self.state.read();
        self.snapshot_of(&state)
    }

    /// Move to the next item and broadcast it
    ///
    /// An idle station starts from the first item; a playing one wraps
    /// around the playlist. Returns `None` and stays idle when the playlist
    /// is empty.
    pub fn advance(&self) -> Option<Arc<Snapshot>> {
        let mut state = self.state.write();
        let total = self.store.len();

        let Some(index) = state.next_index(total) else {
            if state.is_playing() {
                tracing::warn!("Playlist emptied while playing, going idle");
            }
            *state = PlaybackState::Idle;
            return None;
        };

        let item = match self.store.get(index) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot advance, going idle");
                *state = PlaybackState::Idle;
                return None;
            }
        };

        let segment = Segment::start(index);
        *state = PlaybackState::Playing(segment);

        let snapshot = Arc::new(Snapshot::new(&segment, &item, total));
        let report = self.registry.broadcast(&snapshot);

        tracing::info!(
            index = index,
            total = total,
            url = %snapshot.video_url,
            duration_secs = snapshot.duration,
            subscribers = report.delivered,
            "Now playing"
        );

        Some(snapshot)
    }

    /// Add an item to the end of the playlist
    pub fn append(&self, url: impl Into<String>, duration: Duration) -> Result<usize, PlaylistError> {
        let index = self.store.append(url, duration)?;
        tracing::info!(index = index, total = index + 1, "Item added to playlist");
        Ok(index)
    }

    /// Like the item at `index`, returning its new count
    pub fn like(&self, index: usize) -> Result<u64, PlaylistError> {
        let likes = self.store.increment_like(index)?;
        tracing::info!(index = index, likes = likes, "Item liked");
        Ok(likes)
    }

    /// Full playlist plus the index on air
    pub fn listing(&self) -> PlaylistListing {
        let state = self.state.read();
        PlaylistListing {
            videos: self.store.entries(),
            current_index: state.current_index(),
        }
    }

    /// Spawn the advancer loop for this station
    pub fn spawn_advancer(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        Advancer::new(Arc::clone(self)).spawn()
    }

    fn snapshot_of(&self, state: &PlaybackState) -> Option<Arc<Snapshot>> {
        let segment = state.segment()?;

        match self.store.get(segment.index) {
            Ok(item) => Some(Arc::new(Snapshot::new(segment, &item, self.store.len()))),
            Err(e) => {
                tracing::warn!(error = %e, "Playing index not in playlist");
                None
            }
        }
    }
}

impl Default for Station {
    fn default() -> Self {
        Self::new(StationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::RegistryConfig;

    use super::*;

    fn station_with(items: &[(&str, u64)]) -> Station {
        let station = Station::default();
        for (url, secs) in items {
            station.append(*url, Duration::from_secs(*secs)).unwrap();
        }
        station
    }

    #[tokio::test]
    async fn test_idle_station() {
        let station = Station::default();

        assert!(station.now_playing().is_none());
        assert!(station.advance().is_none());
        assert_eq!(station.state(), PlaybackState::Idle);

        let mut sub = station.subscribe();
        assert!(sub.try_recv().is_none());
        assert_eq!(station.listing().current_index, None);
    }

    #[tokio::test]
    async fn test_first_advance_starts_at_top() {
        let station = station_with(&[("A", 10), ("B", 5)]);
        let mut sub = station.subscribe();

        let snapshot = station.advance().unwrap();
        assert_eq!(snapshot.video_url, "A");
        assert_eq!(snapshot.index, 0);
        assert_eq!(snapshot.total, 2);

        let received = sub.recv().await.unwrap();
        assert!(Arc::ptr_eq(&received, &snapshot));
        assert_eq!(station.listing().current_index, Some(0));
    }

    #[tokio::test]
    async fn test_advance_is_cyclic() {
        let station = station_with(&[("A", 1), ("B", 2), ("C", 3)]);
        let start = station.advance().unwrap().index;

        let indices: Vec<_> = (0..3).map(|_| station.advance().unwrap().index).collect();

        assert_eq!(indices, vec![1, 2, 0]);
        assert_eq!(station.state().current_index(), Some(start));
    }

    #[tokio::test]
    async fn test_resync_matches_segment() {
        let station = station_with(&[("A", 10)]);
        let on_air = station.advance().unwrap();

        let mut sub = station.subscribe();
        let resync = sub.try_recv().unwrap();

        assert_eq!(resync.start_time, on_air.start_time);
        assert_eq!(resync.started_at, on_air.started_at);
        assert_eq!(resync.index, on_air.index);
        // Exactly one immediate delivery
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resync_elapsed_within_segment() {
        let station = station_with(&[("A", 10)]);
        station.advance().unwrap();

        tokio::time::advance(Duration::from_millis(6_500)).await;

        let mut sub = station.subscribe();
        let resync = sub.try_recv().unwrap();
        assert_eq!(resync.elapsed(), Duration::from_millis(6_500));
        assert!(resync.elapsed() < resync.segment_duration());
        assert_eq!(resync.remaining(), Duration::from_millis(3_500));
    }

    #[tokio::test]
    async fn test_like_shows_in_listing_and_snapshot() {
        let station = station_with(&[("A", 10), ("B", 5)]);

        assert_eq!(station.like(1).unwrap(), 1);
        assert_eq!(station.like(1).unwrap(), 2);
        assert!(matches!(
            station.like(2),
            Err(PlaylistError::IndexOutOfRange { .. })
        ));

        let listing = station.listing();
        assert_eq!(listing.videos[1].likes, 2);

        station.advance().unwrap();
        let snapshot = station.advance().unwrap();
        assert_eq!(snapshot.video_url, "B");
        assert_eq!(snapshot.likes, 2);
    }

    #[tokio::test]
    async fn test_append_grows_total() {
        let station = station_with(&[("A", 10)]);
        station.advance().unwrap();

        station.append("B", Duration::from_secs(5)).unwrap();

        let snapshot = station.advance().unwrap();
        assert_eq!(snapshot.video_url, "B");
        assert_eq!(snapshot.total, 2);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_not_attempted() {
        let station = station_with(&[("A", 10)]);
        let sub = station.subscribe();
        drop(sub);

        station.advance().unwrap();

        assert_eq!(station.registry().subscriber_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_subscribe_races_with_advance() {
        let config = StationConfig::default().registry(RegistryConfig::default().subscriber_buffer(512));
        let station = Arc::new(Station::new(config));
        for url in ["A", "B", "C"] {
            station.append(url, Duration::from_secs(1)).unwrap();
        }
        station.advance().unwrap();

        let advancer = {
            let station = Arc::clone(&station);
            tokio::spawn(async move {
                for _ in 0..300 {
                    station.advance().unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        let mut subscribers = Vec::new();
        for _ in 0..50 {
            let mut sub = station.subscribe();
            // Resync snapshot is queued before subscribe returns
            let first = sub.try_recv().unwrap();
            subscribers.push((sub, first));
            tokio::task::yield_now().await;
        }

        advancer.await.unwrap();

        for (mut sub, first) in subscribers {
            let mut prev = first;
            while let Some(next) = sub.try_recv() {
                // Every step is one advancement; no repeats, no gaps
                assert_eq!(next.index, (prev.index + 1) % 3);
                assert!(next.started_at >= prev.started_at);
                prev = next;
            }
            assert_eq!(prev.index, station.state().current_index().unwrap());
        }
    }
}
