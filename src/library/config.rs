//! Library configuration

use std::path::PathBuf;
use std::time::Duration;

/// Extensions recognised as video files
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "mkv"];

/// Where media lives and how long scanned items play
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Bundled videos, served under `/static`
    pub static_dir: PathBuf,

    /// Uploaded videos, served under `/uploads`
    pub uploads_dir: PathBuf,

    /// Accepted extensions, lowercase, without the dot
    pub extensions: Vec<String>,

    /// On-air duration for videos found in `static_dir`
    pub static_duration: Duration,

    /// On-air duration for videos found in `uploads_dir`, and for uploads
    /// that do not specify one
    pub upload_duration: Duration,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            uploads_dir: PathBuf::from("uploads"),
            extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            static_duration: Duration::from_secs(10),
            upload_duration: Duration::from_secs(30),
        }
    }
}

impl LibraryConfig {
    /// Set the static directory
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Set the uploads directory
    pub fn uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = dir.into();
        self
    }

    /// Replace the accepted extensions
    ///
    /// Leading dots and case are ignored (`".MP4"` and `"mp4"` are the same).
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Set the default duration for static videos
    pub fn static_duration(mut self, duration: Duration) -> Self {
        self.static_duration = duration;
        self
    }

    /// Set the default duration for uploaded videos
    pub fn upload_duration(mut self, duration: Duration) -> Self {
        self.upload_duration = duration;
        self
    }
}
