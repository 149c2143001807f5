//! Crate-level error type

use crate::library::LibraryError;
use crate::playlist::PlaylistError;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the station and its server
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Playlist operation rejected
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    /// Media library failure
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    /// Socket or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
