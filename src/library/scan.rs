//! Directory scanning for the initial playlist

use std::path::Path;
use std::time::Duration;

use crate::playlist::{ItemSeed, PlaylistStore};

use super::config::LibraryConfig;
use super::error::LibraryError;

/// Check a file name against the accepted extensions (case-insensitive)
pub fn is_video_file(name: &str, extensions: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|accepted| accepted.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// List the video files in `dir` as playlist seeds
///
/// Urls are `<url_prefix>/<file name>`, sorted by file name. A missing
/// directory yields no seeds.
pub async fn scan_dir(
    dir: &Path,
    url_prefix: &str,
    duration: Duration,
    extensions: &[String],
) -> Result<Vec<ItemSeed>, LibraryError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Media directory missing, skipping");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(dir = %dir.display(), "Skipping file with non UTF-8 name");
            continue;
        };

        if is_video_file(&name, extensions) {
            names.push(name);
        }
    }
    names.sort();

    let prefix = url_prefix.trim_end_matches('/');
    Ok(names
        .into_iter()
        .map(|name| ItemSeed {
            url: format!("{prefix}/{name}"),
            duration,
        })
        .collect())
}

/// Fill the store from the static and uploads directories
///
/// Static videos come first, then uploads. Returns the number of items
/// added.
pub async fn seed(store: &PlaylistStore, config: &LibraryConfig) -> Result<usize, LibraryError> {
    let sources = [
        (&config.static_dir, "/static", config.static_duration),
        (&config.uploads_dir, "/uploads", config.upload_duration),
    ];

    let mut added = 0;
    for (dir, prefix, duration) in sources {
        let seeds = scan_dir(dir, prefix, duration, &config.extensions).await?;
        for seed in &seeds {
            tracing::info!(url = %seed.url, duration_secs = seed.duration.as_secs(), "Found video");
        }
        added += store.extend(seeds);
    }

    if added == 0 {
        tracing::warn!(
            static_dir = %config.static_dir.display(),
            uploads_dir = %config.uploads_dir.display(),
            "No videos found"
        );
    } else {
        tracing::info!(items = added, "Playlist seeded");
    }

    Ok(added)
}
