use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

use crate::{
    frames::{clear_stale_frames, frame_pattern, list_frames, Frame},
    settings::PipelineSettings,
    tools::{FrameTools, ToolError, SAMPLE_FPS},
};

/// Turns a recording into numbered stills inside the working directory.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    pub work_dir:        PathBuf,
    pub frame_extension: String,
    pub max_frames:      Option<usize>,
}

impl FrameExtractor {
    #[inline]
    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self {
            work_dir:        settings.work_dir.clone(),
            frame_extension: settings.frame_extension.clone(),
            max_frames:      settings.max_frames,
        }
    }

    /// Purges leftovers from earlier runs, runs the decoder once and returns
    /// the extracted frames in index order.
    #[inline]
    pub fn extract<T: FrameTools + ?Sized>(
        &self,
        tools: &T,
        video: &Path,
    ) -> Result<Vec<Frame>, ExtractionError> {
        let removed = clear_stale_frames(&self.work_dir, &self.frame_extension).map_err(|source| {
            ExtractionError::WorkDir {
                path: self.work_dir.clone(),
                source,
            }
        })?;
        info!("Cleared {removed} old frame(s)");

        info!("Extracting frames ({SAMPLE_FPS} fps)...");
        let pattern = frame_pattern(&self.work_dir, &self.frame_extension);
        tools.extract_frames(video, &pattern, self.max_frames)?;

        let frames = list_frames(&self.work_dir, &self.frame_extension).map_err(|source| {
            ExtractionError::WorkDir {
                path: self.work_dir.clone(),
                source,
            }
        })?;
        info!(
            "Frame extraction complete: {} frame(s) in {}",
            frames.len(),
            self.work_dir.display()
        );

        Ok(frames)
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Working directory {path} is unusable")]
    WorkDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Decoder(#[from] ToolError),
}
