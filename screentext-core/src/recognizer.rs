use tracing::{debug, warn};

use crate::{
    document::{FrameOutcome, FrameSection},
    frames::Frame,
    preprocess::PreprocessOptions,
    tools::{FrameTools, ToolError},
};

/// Preprocesses and recognizes one frame under a single error boundary.
///
/// A failure in either step becomes [`FrameOutcome::Failed`]; it never
/// escapes to the caller.
#[inline]
pub fn recognize_frame<T: FrameTools + ?Sized>(
    tools: &T,
    frame: &Frame,
    options: &PreprocessOptions,
) -> FrameSection {
    let file_name = frame.file_name();
    let outcome = match preprocess_and_recognize(tools, frame, options) {
        Ok(text) => {
            debug!("OCR result length for {file_name}: {} characters", text.len());
            FrameOutcome::Recognized(text)
        },
        Err(e) => {
            warn!("OCR failed on {file_name}: {e}");
            FrameOutcome::Failed(e.to_string())
        },
    };

    FrameSection {
        index: frame.index,
        file_name,
        outcome,
    }
}

fn preprocess_and_recognize<T: FrameTools + ?Sized>(
    tools: &T,
    frame: &Frame,
    options: &PreprocessOptions,
) -> Result<String, ToolError> {
    let prepped = frame.preprocessed_path();
    tools.preprocess(&frame.path, &prepped, options)?;
    tools.recognize(&prepped)
}
