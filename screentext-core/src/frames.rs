use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::selector::has_extension;

pub const FRAME_PREFIX: &str = "frame_";
pub const PREPROCESSED_SUFFIX: &str = "_prep";
/// Width of the zero-padded frame index. Fixed width keeps lexicographic
/// and numeric order identical.
pub const FRAME_INDEX_WIDTH: usize = 5;

/// One sampled still, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub path:  PathBuf,
}

impl Frame {
    #[inline]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Sibling path the preprocessed image is written to.
    #[inline]
    pub fn preprocessed_path(&self) -> PathBuf {
        let stem = self.path.file_stem().unwrap_or_default().to_string_lossy();
        let mut name = format!("{stem}{PREPROCESSED_SUFFIX}");
        if let Some(ext) = self.path.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        self.path.with_file_name(name)
    }
}

#[inline]
pub fn frame_file_name(index: usize, extension: &str) -> String {
    format!("{FRAME_PREFIX}{index:0width$}.{extension}", width = FRAME_INDEX_WIDTH)
}

/// Output pattern handed to the decoder, e.g. `frame_%05d.png`.
///
/// The decoder expands printf sequences across the whole path, so a `%` in
/// `work_dir` is doubled.
#[inline]
pub fn frame_pattern(work_dir: &Path, extension: &str) -> PathBuf {
    let file_pattern = format!("{FRAME_PREFIX}%0{FRAME_INDEX_WIDTH}d.{extension}");
    let dir = work_dir.to_string_lossy();
    if dir.contains('%') {
        return PathBuf::from(dir.replace('%', "%%")).join(file_pattern);
    }
    work_dir.join(file_pattern)
}

/// Parses the index out of `frame_00012.png`. Preprocessed images and
/// foreign files yield `None`.
#[inline]
pub fn parse_frame_index(file_name: &str, extension: &str) -> Option<usize> {
    let digits = file_name
        .strip_prefix(FRAME_PREFIX)?
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    if digits.len() < FRAME_INDEX_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Creates `work_dir` if needed and deletes every leftover image carrying
/// `extension`. Returns the number of files removed.
#[inline]
pub fn clear_stale_frames(work_dir: &Path, extension: &str) -> io::Result<usize> {
    fs::create_dir_all(work_dir)?;

    let mut removed = 0;
    for entry in fs::read_dir(work_dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extension) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    debug!("Cleared {removed} old frame(s) from {}", work_dir.display());
    Ok(removed)
}

/// Lists extracted frames in index order. Index gaps are logged but kept.
#[inline]
pub fn list_frames(work_dir: &Path, extension: &str) -> io::Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for entry in fs::read_dir(work_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(index) = parse_frame_index(&name.to_string_lossy(), extension) {
            frames.push(Frame {
                index,
                path: entry.path(),
            });
        }
    }

    let frames = frames.into_iter().sorted_by_key(|frame| frame.index).collect::<Vec<_>>();
    for (expected, frame) in (1..).zip(&frames) {
        if frame.index != expected {
            warn!(
                "Frame sequence gap: expected index {expected}, found {}",
                frame.file_name()
            );
            break;
        }
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(frame_file_name(1, "png"), "frame_00001.png");
        assert_eq!(frame_file_name(12345, "png"), "frame_12345.png");
        assert_eq!(
            frame_pattern(&PathBuf::from("/w"), "png"),
            PathBuf::from("/w/frame_%05d.png")
        );
    }

    #[test]
    fn percent_in_work_dir_is_escaped() {
        assert_eq!(
            frame_pattern(Path::new("/w/100%done"), "png"),
            PathBuf::from("/w/100%%done/frame_%05d.png")
        );
    }

    #[test]
    fn parses_only_plain_frames() {
        assert_eq!(parse_frame_index("frame_00007.png", "png"), Some(7));
        assert_eq!(parse_frame_index("frame_123456.png", "png"), Some(123_456));
        assert_eq!(parse_frame_index("frame_00007_prep.png", "png"), None);
        assert_eq!(parse_frame_index("frame_7.png", "png"), None);
        assert_eq!(parse_frame_index("frame_00007.jpg", "png"), None);
        assert_eq!(parse_frame_index("shot_00007.png", "png"), None);
    }

    #[test]
    fn preprocessed_path_keeps_extension() {
        let frame = Frame {
            index: 3,
            path:  PathBuf::from("/w/frame_00003.png"),
        };

        assert_eq!(frame.preprocessed_path(), PathBuf::from("/w/frame_00003_prep.png"));
        assert_eq!(frame.file_name(), "frame_00003.png");
    }

    #[test]
    fn clearing_removes_only_images() {
        let dir = TempDir::new().unwrap();
        for name in ["frame_00001.png", "frame_00001_prep.png", "old.png", "keep.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let removed = clear_stale_frames(dir.path(), "png").unwrap();

        assert_eq!(removed, 3);
        let left = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(left, 1);
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn clearing_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("nested/frames");

        assert_eq!(clear_stale_frames(&work, "png").unwrap(), 0);
        assert!(work.is_dir());
    }

    #[test]
    fn listing_is_ordered_and_skips_intermediates() {
        let dir = TempDir::new().unwrap();
        for name in ["frame_00010.png", "frame_00002.png", "frame_00001.png", "frame_00002_prep.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let frames = list_frames(dir.path(), "png").unwrap();

        assert_eq!(frames.iter().map(|f| f.index).collect::<Vec<_>>(), vec![1, 2, 10]);
    }
}
