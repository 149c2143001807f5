//! Library error types

/// Error type for library operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// File name does not carry an accepted video extension
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    /// File system failure while scanning or saving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
