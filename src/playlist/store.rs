//! Playlist store implementation

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::error::PlaylistError;
use super::item::{ItemSeed, PlaylistEntry, PlaylistItem};

/// Longest on-air duration an item may have (one year)
pub const MAX_ITEM_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Check that `duration` is an acceptable on-air time for `url`
///
/// Items play for at least one second and at most [`MAX_ITEM_DURATION`].
pub fn validate_duration(url: &str, duration: Duration) -> Result<(), PlaylistError> {
    if duration.as_secs() == 0 {
        return Err(PlaylistError::InvalidDuration(url.to_string()));
    }
    if duration > MAX_ITEM_DURATION {
        return Err(PlaylistError::DurationTooLong {
            url: url.to_string(),
            max_secs: MAX_ITEM_DURATION.as_secs(),
        });
    }
    Ok(())
}

/// Ordered, append-only collection of playlist items
///
/// All operations are synchronous and hold the lock only for the lookup or
/// push itself, so they are safe to call from async tasks.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<Arc<PlaylistItem>>,
    urls: HashSet<String>,
}

impl PlaylistStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the end of the playlist
    ///
    /// Returns the index of the new item.
    pub fn append(&self, url: impl Into<String>, duration: Duration) -> Result<usize, PlaylistError> {
        let url = url.into();

        validate_duration(&url, duration)?;

        let mut inner = self.inner.write();

        if inner.urls.contains(&url) {
            return Err(PlaylistError::DuplicateItem(url));
        }

        let index = inner.items.len();
        inner.urls.insert(url.clone());
        inner
            .items
            .push(Arc::new(PlaylistItem::new(url, duration)));

        tracing::debug!(
            index = index,
            url = %inner.items[index].url(),
            duration_secs = duration.as_secs(),
            "Playlist item appended"
        );

        Ok(index)
    }

    /// Append many items, skipping the ones the store rejects
    ///
    /// Returns the number of items added.
    pub fn extend<I>(&self, seeds: I) -> usize
    where
        I: IntoIterator<Item = ItemSeed>,
    {
        let mut added = 0;

        for seed in seeds {
            match self.append(seed.url, seed.duration) {
                Ok(_) => added += 1,
                Err(e) => tracing::warn!(error = %e, "Skipping playlist item"),
            }
        }

        added
    }

    /// Get the item at `index`
    pub fn get(&self, index: usize) -> Result<Arc<PlaylistItem>, PlaylistError> {
        let inner = self.inner.read();

        inner
            .items
            .get(index)
            .cloned()
            .ok_or(PlaylistError::IndexOutOfRange {
                index,
                size: inner.items.len(),
            })
    }

    /// Add one like to the item at `index`, returning the new count
    pub fn increment_like(&self, index: usize) -> Result<u64, PlaylistError> {
        let item = self.get(index)?;
        Ok(item.like())
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Check if the playlist has no items
    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Copy of every item, in playlist order
    pub fn entries(&self) -> Vec<PlaylistEntry> {
        self.inner
            .read()
            .items
            .iter()
            .map(|item| item.entry())
            .collect()
    }
}
