//! Now-playing snapshots
//!
//! A snapshot is everything a viewer needs to join the broadcast at the
//! right offset: which item, when its segment started and how long it runs.
//! Snapshots are immutable and shared between subscribers as `Arc<Snapshot>`.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use super::state::Segment;
use crate::playlist::PlaylistItem;

/// Fallback deadline offset for durations the clock cannot represent
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Immutable description of the item on air
///
/// Serializes to the wire format viewers consume:
/// `{"video_url", "start_time", "duration", "likes", "index", "total"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Media url of the playing item
    pub video_url: String,
    /// Segment start in unix seconds
    pub start_time: u64,
    /// Item duration in seconds
    pub duration: u64,
    /// Like count when the snapshot was taken
    pub likes: u64,
    /// Index of the item in the playlist
    pub index: usize,
    /// Playlist size when the snapshot was taken
    pub total: usize,
    /// Monotonic segment start
    #[serde(skip)]
    pub started_at: Instant,
}

impl Snapshot {
    /// Build a snapshot from the current segment and its item
    pub fn new(segment: &Segment, item: &PlaylistItem, total: usize) -> Self {
        Self {
            video_url: item.url().to_string(),
            start_time: segment.start_time,
            duration: item.duration().as_secs(),
            likes: item.likes(),
            index: segment.index,
            total,
            started_at: segment.started_at,
        }
    }

    /// Duration of the segment
    pub fn segment_duration(&self) -> Duration {
        Duration::from_secs(self.duration)
    }

    /// When the segment is due to end
    ///
    /// Saturates to a far-future instant when the duration does not fit the
    /// clock.
    pub fn deadline(&self) -> Instant {
        self.started_at
            .checked_add(self.segment_duration())
            .or_else(|| self.started_at.checked_add(FAR_FUTURE))
            .unwrap_or(self.started_at)
    }

    /// Playback offset into the segment at `now`, capped at the duration
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
            .min(self.segment_duration())
    }

    /// Playback offset into the segment right now
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Time left in the segment right now
    pub fn remaining(&self) -> Duration {
        self.segment_duration() - self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use crate::playlist::PlaylistStore;

    use super::*;

    fn snapshot_for(duration_secs: u64) -> Snapshot {
        let store = PlaylistStore::new();
        store
            .append("/static/a.mp4", Duration::from_secs(duration_secs))
            .unwrap();
        store.increment_like(0).unwrap();

        let item = store.get(0).unwrap();
        Snapshot::new(&Segment::start(0), &item, store.len())
    }

    #[tokio::test]
    async fn test_snapshot_fields() {
        let snapshot = snapshot_for(10);

        assert_eq!(snapshot.video_url, "/static/a.mp4");
        assert_eq!(snapshot.duration, 10);
        assert_eq!(snapshot.likes, 1);
        assert_eq!(snapshot.index, 0);
        assert_eq!(snapshot.total, 1);
    }

    #[tokio::test]
    async fn test_wire_format() {
        let snapshot = snapshot_for(10);
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["duration", "index", "likes", "start_time", "total", "video_url"]
        );
        assert_eq!(json["start_time"], snapshot.start_time);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_tracks_segment_start() {
        let snapshot = snapshot_for(10);
        assert_eq!(snapshot.elapsed(), Duration::ZERO);
        assert_eq!(snapshot.remaining(), Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(snapshot.elapsed(), Duration::from_secs(4));
        assert_eq!(snapshot.remaining(), Duration::from_secs(6));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(snapshot.elapsed(), Duration::from_secs(10));
        assert_eq!(snapshot.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_does_not_overflow() {
        let mut snapshot = snapshot_for(10);
        snapshot.duration = u64::MAX;

        let deadline = snapshot.deadline();
        assert!(deadline >= snapshot.started_at + FAR_FUTURE);
        assert_eq!(snapshot.remaining(), Duration::from_secs(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline() {
        let snapshot = snapshot_for(7);
        assert_eq!(
            snapshot.deadline() - snapshot.started_at,
            Duration::from_secs(7)
        );
    }
}
