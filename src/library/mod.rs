//! Media library
//!
//! Feeds the playlist store from outside the core: a directory scan at
//! startup, and uploads saved to disk while the station is running.

pub mod config;
pub mod error;
pub mod scan;
pub mod upload;

pub use config::LibraryConfig;
pub use error::LibraryError;
pub use scan::{is_video_file, scan_dir, seed};
pub use upload::{StoredUpload, UploadStore};
