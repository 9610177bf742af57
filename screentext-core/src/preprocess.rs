use std::{ffi::OsString, path::Path};

use serde::{Deserialize, Serialize};

/// Normalization applied to every frame before recognition.
///
/// The image tool applies the steps in a fixed order: resize, grayscale,
/// threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreprocessOptions {
    pub resize_percent:    u32,
    pub grayscale:         bool,
    pub threshold_percent: u8,
}

impl Default for PreprocessOptions {
    #[inline]
    fn default() -> Self {
        Self {
            resize_percent:    150,
            grayscale:         true,
            threshold_percent: 50,
        }
    }
}

impl PreprocessOptions {
    /// Image tool arguments, e.g.
    /// `in.png -resize 150% -colorspace Gray -threshold 50% out.png`.
    #[inline]
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![input.into()];
        args.push("-resize".into());
        args.push(format!("{}%", self.resize_percent).into());
        if self.grayscale {
            args.push("-colorspace".into());
            args.push("Gray".into());
        }
        args.push("-threshold".into());
        args.push(format!("{}%", self.threshold_percent).into());
        args.push(output.into());
        args
    }
}
