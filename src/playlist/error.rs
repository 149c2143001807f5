//! Playlist error types

/// Error type for playlist operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaylistError {
    /// Requested index is outside the playlist
    #[error("Index {index} out of range (playlist size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// Items must play for at least one second
    #[error("Invalid duration for {0}: must be at least one second")]
    InvalidDuration(String),

    /// Item would stay on air longer than the store accepts
    #[error("Invalid duration for {url}: longer than {max_secs} seconds")]
    DurationTooLong { url: String, max_secs: u64 },

    /// An item with the same url is already in the playlist
    #[error("Item already in playlist: {0}")]
    DuplicateItem(String),
}
