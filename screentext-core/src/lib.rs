//! Batch screen-text capture for screen recordings.
//!
//! A run selects one recording, samples it into still frames with an
//! external decoder, normalizes each frame with an external image tool and
//! feeds it to an external text recognizer. The per-frame results are
//! aggregated, in frame order, into a single labeled text document.

pub mod document;
pub mod extractor;
pub mod frames;
pub mod pipeline;
pub mod preprocess;
pub mod progress;
pub mod recognizer;
pub mod selector;
pub mod session;
pub mod settings;
pub mod tools;

pub use document::{FrameOutcome, FrameSection, ScreenTextDocument};
pub use pipeline::{Pipeline, PipelineError, PipelineReport, PipelineState};
pub use selector::{select_video, SelectorError, VideoAsset};
pub use settings::{PipelineSettings, ToolSettings};
pub use tools::{ExternalTools, FrameTools, ToolError, ToolKind};

pub const DEFAULT_VIDEO_EXTENSION: &str = "mkv";
pub const DEFAULT_FRAME_EXTENSION: &str = "png";
pub const SCREEN_TEXT_FILE_NAME: &str = "screen-text.txt";
