use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use thiserror::Error;
use tracing::{debug, info};

/// A recording chosen for a run. Never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    pub path:     PathBuf,
    pub modified: SystemTime,
}

/// Resolves the recording to process.
///
/// An explicit name always wins: absolute names are used as given, relative
/// ones are joined onto `search_dir`. Without a name the file in
/// `search_dir` with `extension` and the latest modification time is used.
#[inline]
pub fn select_video(
    explicit: Option<&Path>,
    search_dir: &Path,
    extension: &str,
) -> Result<VideoAsset, SelectorError> {
    let path = match explicit {
        Some(name) if name.is_absolute() => name.to_path_buf(),
        Some(name) => search_dir.join(name),
        None => latest_video(search_dir, extension)?,
    };

    let asset = open_asset(&path)?;
    info!("Using video: {}", asset.path.display());
    Ok(asset)
}

fn open_asset(path: &Path) -> Result<VideoAsset, SelectorError> {
    let not_found = |source: io::Error| SelectorError::NotFound {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    // Readability is checked up front so a bad path never reaches the decoder.
    File::open(path).map_err(not_found)?;

    Ok(VideoAsset {
        path:     path.to_path_buf(),
        modified: metadata.modified().map_err(not_found)?,
    })
}

fn latest_video(search_dir: &Path, extension: &str) -> Result<PathBuf, SelectorError> {
    let entries = fs::read_dir(search_dir).map_err(|source| SelectorError::UnreadableDirectory {
        path: search_dir.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if let Ok(modified) = metadata.modified() {
            candidates.push((modified, path));
        }
    }
    debug!(
        "Found {} .{} file(s) in {}",
        candidates.len(),
        extension,
        search_dir.display()
    );

    candidates.into_iter().max().map(|(_, path)| path).ok_or_else(|| {
        SelectorError::NoMediaFiles {
            directory: search_dir.to_path_buf(),
            extension: extension.to_owned(),
        }
    })
}

#[inline]
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Video file not found: {path}")]
    NotFound {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No .{extension} files found in {directory}")]
    NoMediaFiles {
        directory: PathBuf,
        extension: String,
    },
    #[error("Cannot read video directory {path}")]
    UnreadableDirectory {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::{
        fs::{self, File},
        path::Path,
        time::{Duration, SystemTime},
    };

    use tempfile::TempDir;

    use super::{select_video, SelectorError};

    fn touch(dir: &Path, name: &str, age_secs: u64) {
        let file = File::create(dir.join(name)).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs)).unwrap();
    }

    #[test]
    fn explicit_name_wins_over_newer_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "clip2.mkv", 500);
        touch(dir.path(), "clip5.mkv", 10);

        let asset = select_video(Some(Path::new("clip2.mkv")), dir.path(), "mkv").unwrap();

        assert_eq!(asset.path, dir.path().join("clip2.mkv"));
    }

    #[test]
    fn absolute_name_ignores_search_dir() {
        let videos = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(elsewhere.path(), "talk.mkv", 0);
        let absolute = elsewhere.path().join("talk.mkv");

        let asset = select_video(Some(&absolute), videos.path(), "mkv").unwrap();

        assert_eq!(asset.path, absolute);
    }

    #[test]
    fn picks_most_recently_modified() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mkv", 300);
        touch(dir.path(), "b.mkv", 30);
        touch(dir.path(), "c.mkv", 3000);
        touch(dir.path(), "newest-but-wrong.mp4", 1);

        let asset = select_video(None, dir.path(), "mkv").unwrap();

        assert_eq!(asset.path, dir.path().join("b.mkv"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "LOUD.MKV", 0);

        let asset = select_video(None, dir.path(), "mkv").unwrap();

        assert_eq!(asset.path, dir.path().join("LOUD.MKV"));
    }

    #[test]
    fn empty_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "notes.txt", 0);
        fs::create_dir(dir.path().join("folder.mkv")).unwrap();

        let err = select_video(None, dir.path(), "mkv").unwrap_err();

        assert!(matches!(err, SelectorError::NoMediaFiles { .. }));
    }

    #[test]
    fn missing_video_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-videos");

        let err = select_video(None, &missing, "mkv").unwrap_err();

        assert!(
            matches!(&err, SelectorError::UnreadableDirectory { path, .. } if *path == missing)
        );
    }

    #[test]
    fn missing_explicit_file_does_not_fall_back() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "present.mkv", 0);

        let err = select_video(Some(Path::new("absent.mkv")), dir.path(), "mkv").unwrap_err();

        assert!(matches!(err, SelectorError::NotFound { .. }));
    }
}
