use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    preprocess::PreprocessOptions,
    DEFAULT_FRAME_EXTENSION,
    DEFAULT_VIDEO_EXTENSION,
    SCREEN_TEXT_FILE_NAME,
};

/// Executables for the three external collaborators.
///
/// Each value is looked up on `PATH` unless it is a path itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolSettings {
    pub decoder:         String,
    pub image_processor: String,
    pub recognizer:      String,
    /// Passed to the recognizer as `-l <language>` when set.
    pub language:        Option<String>,
}

impl Default for ToolSettings {
    #[inline]
    fn default() -> Self {
        Self {
            decoder:         "ffmpeg".to_owned(),
            image_processor: "convert".to_owned(),
            recognizer:      "tesseract".to_owned(),
            language:        None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Directory searched for recordings, and the base for relative video
    /// arguments.
    pub video_dir:       PathBuf,
    pub video_extension: String,
    /// Holds extracted and preprocessed frames. Cleared at the start of
    /// every run and left populated afterwards.
    pub work_dir:        PathBuf,
    /// Each run writes `<output_dir>/<video stem>/screen-text.txt`.
    pub output_dir:      PathBuf,
    pub frame_extension: String,
    /// Upper bound on sampled frames. `None` samples the whole recording.
    pub max_frames:      Option<usize>,
    pub tools:           ToolSettings,
    pub preprocess:      PreprocessOptions,
}

impl Default for PipelineSettings {
    #[inline]
    fn default() -> Self {
        Self {
            video_dir:       PathBuf::from("./videos"),
            video_extension: DEFAULT_VIDEO_EXTENSION.to_owned(),
            work_dir:        PathBuf::from("./output/frames"),
            output_dir:      PathBuf::from("./output"),
            frame_extension: DEFAULT_FRAME_EXTENSION.to_owned(),
            max_frames:      None,
            tools:           ToolSettings::default(),
            preprocess:      PreprocessOptions::default(),
        }
    }
}

impl PipelineSettings {
    /// Path of the aggregated document for `video`.
    #[inline]
    pub fn output_path(&self, video: &Path) -> PathBuf {
        let stem = video
            .file_stem()
            .map_or_else(|| "video".into(), |stem| stem.to_string_lossy());
        self.output_dir.join(stem.as_ref()).join(SCREEN_TEXT_FILE_NAME)
    }

    /// Re-roots every relative directory onto `base`.
    #[inline]
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for dir in [&mut self.video_dir, &mut self.work_dir, &mut self.output_dir] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}
