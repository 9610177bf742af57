use std::{io, path::PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::{
    document::ScreenTextDocument,
    extractor::{ExtractionError, FrameExtractor},
    progress::{ProcessCompletion, ProgressSink, EXTRACTION, RECOGNITION},
    recognizer::recognize_frame,
    selector::VideoAsset,
    settings::PipelineSettings,
    tools::FrameTools,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    Extracting,
    Recognizing { completed: usize, total: usize },
    Done,
    /// Only extraction can abort a run.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub video:       PathBuf,
    pub output_path: PathBuf,
    pub document:    ScreenTextDocument,
}

impl PipelineReport {
    #[inline]
    pub fn frames(&self) -> usize {
        self.document.len()
    }

    #[inline]
    pub fn failed_frames(&self) -> usize {
        self.document.failed_count()
    }
}

/// Runs extraction, then preprocessing and recognition frame by frame.
///
/// Everything is sequential. Sections are appended in frame order, so the
/// document is reproducible for a given recording.
pub struct Pipeline<T> {
    pub settings: PipelineSettings,
    pub tools:    T,
    progress:     ProgressSink,
    state:        PipelineState,
}

impl<T: FrameTools> Pipeline<T> {
    #[inline]
    pub fn new(settings: PipelineSettings, tools: T) -> Self {
        Self {
            settings,
            tools,
            progress: ProgressSink::default(),
            state: PipelineState::NotStarted,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[inline]
    #[tracing::instrument(skip_all, fields(video = %video.path.display()))]
    pub fn run(&mut self, video: &VideoAsset) -> Result<PipelineReport, PipelineError> {
        let output_path = self.settings.output_path(&video.path);
        info!("Output will be saved to: {}", output_path.display());

        self.state = PipelineState::Extracting;
        self.progress.processing(&EXTRACTION, ProcessCompletion::Indeterminate);
        let extractor = FrameExtractor::from_settings(&self.settings);
        let frames = match extractor.extract(&self.tools, &video.path) {
            Ok(frames) => frames,
            Err(e) => {
                error!("Frame extraction failed: {e}");
                self.state = PipelineState::Aborted;
                self.progress.failed(&EXTRACTION, &e.to_string());
                return Err(e.into());
            },
        };
        self.progress.completed(&EXTRACTION);

        let total = frames.len();
        info!("Running OCR on {total} frame(s)");
        let mut document = ScreenTextDocument::with_capacity(total);
        for (completed, frame) in frames.iter().enumerate() {
            self.state = PipelineState::Recognizing {
                completed,
                total,
            };
            self.progress.processing(&RECOGNITION, ProcessCompletion::Frames {
                completed: completed as u64,
                total:     total as u64,
            });
            info!("Processing frame {}/{total}: {}", completed + 1, frame.file_name());

            document.push(recognize_frame(&self.tools, frame, &self.settings.preprocess));
        }
        self.progress.processing(&RECOGNITION, ProcessCompletion::Frames {
            completed: total as u64,
            total:     total as u64,
        });

        document.write_to(&output_path).map_err(|source| PipelineError::Output {
            path: output_path.clone(),
            source,
        })?;
        self.progress.completed(&RECOGNITION);
        self.state = PipelineState::Done;

        let failed = document.failed_count();
        if failed > 0 {
            info!("Screen text saved to {} ({failed} of {total} frame(s) failed)", output_path.display());
        } else {
            info!("Screen text saved to {}", output_path.display());
        }

        Ok(PipelineReport {
            video: video.path.clone(),
            output_path,
            document,
        })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Frame extraction failed: {0}")]
    ExtractionFailed(#[from] ExtractionError),
    #[error("Cannot write screen text to {path}")]
    Output {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}
