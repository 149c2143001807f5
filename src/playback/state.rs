//! Playback state machine

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

/// The segment currently on air
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index of the playing item
    pub index: usize,
    /// Monotonic start of the segment (sleep deadlines, elapsed offsets)
    pub started_at: Instant,
    /// Wall-clock start in unix seconds (sent to viewers)
    pub start_time: u64,
}

impl Segment {
    /// Start a segment for `index` now
    pub fn start(index: usize) -> Self {
        Self {
            index,
            started_at: Instant::now(),
            start_time: unix_now(),
        }
    }
}

/// Playback state owned by the station
///
/// The index and the start time of the segment live in a single value, so
/// replacing the segment updates both in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing to play
    #[default]
    Idle,
    /// An item is on air
    Playing(Segment),
}

impl PlaybackState {
    /// Current segment, if playing
    pub fn segment(&self) -> Option<&Segment> {
        match self {
            PlaybackState::Playing(segment) => Some(segment),
            PlaybackState::Idle => None,
        }
    }

    /// Index of the playing item, if any
    pub fn current_index(&self) -> Option<usize> {
        self.segment().map(|s| s.index)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing(_))
    }

    /// Index the next segment should play, given the playlist length
    ///
    /// Idle starts from the top; playing wraps around. Returns `None` for an
    /// empty playlist.
    pub fn next_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        match self {
            PlaybackState::Idle => Some(0),
            PlaybackState::Playing(segment) => Some((segment.index + 1) % len),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_no_index() {
        let state = PlaybackState::default();
        assert!(!state.is_playing());
        assert_eq!(state.current_index(), None);
        assert_eq!(state.next_index(0), None);
        assert_eq!(state.next_index(3), Some(0));
    }

    #[test]
    fn test_next_index_wraps() {
        let state = PlaybackState::Playing(Segment::start(2));
        assert_eq!(state.current_index(), Some(2));
        assert_eq!(state.next_index(3), Some(0));
        assert_eq!(state.next_index(5), Some(3));
        assert_eq!(state.next_index(0), None);
    }

    #[test]
    fn test_cycle_returns_to_start() {
        let len = 4;
        let mut state = PlaybackState::Playing(Segment::start(1));

        for _ in 0..len {
            let next = state.next_index(len).unwrap();
            state = PlaybackState::Playing(Segment::start(next));
        }

        assert_eq!(state.current_index(), Some(1));
    }

    #[test]
    fn test_segment_start_time_is_wall_clock() {
        let segment = Segment::start(0);
        assert!(segment.start_time > 1_600_000_000);
    }
}
