//! Playlist item types

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// A playable item owned by the playlist store
#[derive(Debug)]
pub struct PlaylistItem {
    /// Public url of the media; unique within the store
    url: String,

    /// How long the item stays on air
    duration: Duration,

    /// Like counter, bumped concurrently by request handlers
    likes: AtomicU64,
}

impl PlaylistItem {
    pub(super) fn new(url: String, duration: Duration) -> Self {
        Self {
            url,
            duration,
            likes: AtomicU64::new(0),
        }
    }

    /// Media url
    pub fn url(&self) -> &str {
        &self.url
    }

    /// On-air duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current like count
    pub fn likes(&self) -> u64 {
        self.likes.load(Ordering::Acquire)
    }

    /// Atomically add one like, returning the new count
    pub(super) fn like(&self) -> u64 {
        self.likes.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Point-in-time copy for listings
    pub fn entry(&self) -> PlaylistEntry {
        PlaylistEntry {
            url: self.url.clone(),
            duration: self.duration.as_secs(),
            likes: self.likes(),
        }
    }
}

/// Serializable view of an item, as reported by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistEntry {
    pub url: String,
    /// Duration in whole seconds
    pub duration: u64,
    pub likes: u64,
}

/// An item waiting to be appended (from a directory scan or an upload)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSeed {
    pub url: String,
    pub duration: Duration,
}

impl ItemSeed {
    /// Create a seed with a duration in seconds
    pub fn new(url: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            url: url.into(),
            duration: Duration::from_secs(duration_secs),
        }
    }
}
