//! Saving uploaded videos to the uploads directory

use std::path::{Path, PathBuf};

use bytes::Bytes;
use uuid::Uuid;

use super::config::LibraryConfig;
use super::error::LibraryError;
use super::scan::is_video_file;

/// An upload written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Name the file was stored under
    pub file_name: String,
    /// Public url, `/uploads/<file_name>`
    pub url: String,
    /// Location on disk
    pub path: PathBuf,
}

/// Local storage for uploaded videos
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl UploadStore {
    /// Create an upload store writing into the configured uploads directory
    pub fn new(config: &LibraryConfig) -> Self {
        Self {
            dir: config.uploads_dir.clone(),
            extensions: config.extensions.clone(),
        }
    }

    /// Uploads directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save an upload under a collision-free name
    ///
    /// Only the final path component of `original_name` is used. The stored
    /// name is `<stem>_<8 hex chars>.<ext>`.
    pub async fn save(&self, original_name: &str, data: Bytes) -> Result<StoredUpload, LibraryError> {
        let file_name = self.unique_name(original_name)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &data).await?;

        tracing::info!(
            file = %file_name,
            bytes = data.len(),
            dir = %self.dir.display(),
            "Upload stored"
        );

        Ok(StoredUpload {
            url: format!("/uploads/{file_name}"),
            file_name,
            path,
        })
    }

    fn unique_name(&self, original_name: &str) -> Result<String, LibraryError> {
        let invalid = || LibraryError::InvalidFileType(original_name.to_string());

        let base = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(invalid)?;

        if !is_video_file(base, &self.extensions) {
            return Err(invalid());
        }

        let path = Path::new(base);
        let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(invalid)?;

        let tag = Uuid::new_v4().simple().to_string();
        Ok(format!("{stem}_{}.{ext}", &tag[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> UploadStore {
        UploadStore::new(&LibraryConfig::default().uploads_dir(dir))
    }

    #[tokio::test]
    async fn test_save_writes_unique_file() {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        let store = store_in(&uploads);

        let first = store.save("holiday.mp4", Bytes::from_static(b"video")).await.unwrap();
        let second = store.save("holiday.mp4", Bytes::from_static(b"video")).await.unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert!(first.file_name.starts_with("holiday_"));
        assert!(first.file_name.ends_with(".mp4"));
        assert_eq!(first.file_name.len(), "holiday_".len() + 8 + ".mp4".len());
        assert_eq!(first.url, format!("/uploads/{}", first.file_name));
        assert_eq!(std::fs::read(&first.path).unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_save_strips_directories() {
        let root = tempfile::tempdir().unwrap();
        let store = store_in(root.path());

        let stored = store.save("../../etc/clip.webm", Bytes::from_static(b"x")).await.unwrap();

        assert_eq!(stored.path.parent().unwrap(), root.path());
        assert!(stored.file_name.starts_with("clip_"));
    }

    #[tokio::test]
    async fn test_save_rejects_non_video() {
        let root = tempfile::tempdir().unwrap();
        let store = store_in(root.path());

        for name in ["notes.txt", "noext", "", ".."] {
            let result = store.save(name, Bytes::from_static(b"x")).await;
            assert!(
                matches!(result, Err(LibraryError::InvalidFileType(_))),
                "{name} accepted"
            );
        }
    }
}
