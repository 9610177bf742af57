use std::{fmt::Write as _, fs, io, path::Path};

use serde::{Deserialize, Serialize};

pub const FAILURE_MARKER: &str = "⚠️ OCR failed";

/// Result of preprocessing and recognizing one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOutcome {
    Recognized(String),
    Failed(String),
}

impl FrameOutcome {
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSection {
    pub index:     usize,
    pub file_name: String,
    pub outcome:   FrameOutcome,
}

/// Labeled per-frame text in frame order. Holds exactly one section per
/// frame, failed frames included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenTextDocument {
    sections: Vec<FrameSection>,
}

impl ScreenTextDocument {
    #[inline]
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            sections: Vec::with_capacity(frames),
        }
    }

    /// Appends the next section.
    ///
    /// # Panics
    ///
    /// In debug builds, if `section.index` does not increase.
    #[inline]
    pub fn push(&mut self, section: FrameSection) {
        debug_assert!(
            self.sections.last().is_none_or(|last| last.index < section.index),
            "frame sections must be appended in increasing index order"
        );
        self.sections.push(section);
    }

    #[inline]
    pub fn sections(&self) -> &[FrameSection] {
        &self.sections
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[inline]
    pub fn failed_count(&self) -> usize {
        self.sections.iter().filter(|section| section.outcome.is_failed()).count()
    }

    /// Every section is a blank line, a `--- Frame N (file) ---` label and
    /// the trimmed text or a failure marker with the error detail.
    #[inline]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            let _ = write!(out, "\n\n--- Frame {} ({}) ---\n", section.index, section.file_name);
            match &section.outcome {
                FrameOutcome::Recognized(text) => out.push_str(text.trim()),
                FrameOutcome::Failed(reason) => {
                    let _ = write!(out, "{FAILURE_MARKER}: {reason}");
                },
            }
        }
        out
    }

    /// Writes the whole document in one go, replacing any previous result.
    #[inline]
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())
    }
}
