use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output, Stdio},
};

use strum::Display;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{preprocess::PreprocessOptions, settings::ToolSettings};

/// The external collaborators of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ToolKind {
    #[strum(to_string = "decoder")]
    Decoder,
    #[strum(to_string = "image processor")]
    ImageProcessor,
    #[strum(to_string = "recognizer")]
    Recognizer,
}

/// Frames sampled per second of source video.
pub const SAMPLE_FPS: u32 = 1;

/// The three black-box operations the pipeline depends on.
///
/// Every call blocks until the tool exits. Nothing is retried.
pub trait FrameTools {
    /// Samples `video` at [`SAMPLE_FPS`] into numbered images following
    /// `pattern` (a printf-style `frame_%05d.png` path).
    fn extract_frames(
        &self,
        video: &Path,
        pattern: &Path,
        max_frames: Option<usize>,
    ) -> Result<(), ToolError>;

    /// Writes the normalized version of `input` to `output`.
    fn preprocess(
        &self,
        input: &Path,
        output: &Path,
        options: &PreprocessOptions,
    ) -> Result<(), ToolError>;

    /// Returns the recognized text of `image`.
    fn recognize(&self, image: &Path) -> Result<String, ToolError>;
}

/// [`FrameTools`] backed by real executables.
#[derive(Debug, Clone)]
pub struct ExternalTools {
    pub settings: ToolSettings,
}

impl ExternalTools {
    #[inline]
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings,
        }
    }

    #[inline]
    pub fn executable(&self, kind: ToolKind) -> &str {
        match kind {
            ToolKind::Decoder => &self.settings.decoder,
            ToolKind::ImageProcessor => &self.settings.image_processor,
            ToolKind::Recognizer => &self.settings.recognizer,
        }
    }

    /// Resolves `kind` on `PATH`.
    #[inline]
    pub fn locate(&self, kind: ToolKind) -> Result<PathBuf, ToolError> {
        let executable = self.executable(kind);
        which::which(executable).map_err(|source| ToolError::NotInstalled {
            tool:       kind,
            executable: executable.to_owned(),
            source,
        })
    }

    /// Warns about missing per-frame tools. Their absence only fails the
    /// frames that need them, so it is not fatal here.
    #[inline]
    pub fn check_frame_tools(&self) {
        for kind in [ToolKind::ImageProcessor, ToolKind::Recognizer] {
            if let Err(e) = self.locate(kind) {
                warn!("{e}; every frame will be marked as failed");
            }
        }
    }

    fn run(&self, kind: ToolKind, args: &[OsString]) -> Result<Output, ToolError> {
        let mut cmd = Command::new(self.executable(kind));
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        debug!("Running {kind}: {cmd:?}");

        let out = cmd.output().map_err(|source| ToolError::Spawn {
            tool: kind,
            source,
        })?;

        if !out.status.success() {
            return Err(ToolError::Failed {
                tool:   kind,
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
            });
        }

        Ok(out)
    }
}

/// Decoder arguments: one frame per second, numbered output files.
#[inline]
pub fn decoder_args(video: &Path, pattern: &Path, max_frames: Option<usize>) -> Vec<OsString> {
    let mut args: Vec<OsString> =
        ["-hide_banner", "-loglevel", "error", "-y", "-i"].map(OsString::from).to_vec();
    args.push(video.into());
    args.push("-vf".into());
    args.push(format!("fps={SAMPLE_FPS}").into());
    if let Some(max_frames) = max_frames {
        args.push("-frames:v".into());
        args.push(max_frames.to_string().into());
    }
    args.push(pattern.into());
    args
}

/// Recognizer arguments: text goes to stdout.
#[inline]
pub fn recognizer_args(image: &Path, language: Option<&str>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![image.into(), "stdout".into()];
    if let Some(language) = language {
        args.push("-l".into());
        args.push(language.into());
    }
    args
}

impl FrameTools for ExternalTools {
    #[inline]
    fn extract_frames(
        &self,
        video: &Path,
        pattern: &Path,
        max_frames: Option<usize>,
    ) -> Result<(), ToolError> {
        self.run(ToolKind::Decoder, &decoder_args(video, pattern, max_frames))?;
        Ok(())
    }

    #[inline]
    fn preprocess(
        &self,
        input: &Path,
        output: &Path,
        options: &PreprocessOptions,
    ) -> Result<(), ToolError> {
        self.run(ToolKind::ImageProcessor, &options.args(input, output))?;
        Ok(())
    }

    #[inline]
    fn recognize(&self, image: &Path) -> Result<String, ToolError> {
        let out = self.run(
            ToolKind::Recognizer,
            &recognizer_args(image, self.settings.language.as_deref()),
        )?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} executable `{executable}` not found")]
    NotInstalled {
        tool:       ToolKind,
        executable: String,
        #[source]
        source:     which::Error,
    },
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool:   ToolKind,
        #[source]
        source: io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool:   ToolKind,
        status: ExitStatus,
        stderr: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn decoder_samples_one_frame_per_second() {
        let args = decoder_args(Path::new("/v/a.mkv"), Path::new("/w/frame_%05d.png"), None);

        assert_eq!(
            strings(&args),
            [
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-i",
                "/v/a.mkv",
                "-vf",
                "fps=1",
                "/w/frame_%05d.png"
            ]
        );
    }

    #[test]
    fn decoder_honours_frame_cap() {
        let args = strings(&decoder_args(Path::new("a.mkv"), Path::new("f_%05d.png"), Some(90)));

        let cap = args.iter().position(|arg| arg == "-frames:v").unwrap();
        assert_eq!(args[cap + 1], "90");
        assert_eq!(args.last().map(String::as_str), Some("f_%05d.png"));
    }

    #[test]
    fn recognizer_writes_to_stdout() {
        assert_eq!(strings(&recognizer_args(Path::new("p.png"), None)), ["p.png", "stdout"]);
        assert_eq!(
            strings(&recognizer_args(Path::new("p.png"), Some("eng+deu"))),
            ["p.png", "stdout", "-l", "eng+deu"]
        );
    }

    #[test]
    fn missing_executable_is_reported() {
        let tools = ExternalTools::new(ToolSettings {
            recognizer: "definitely-not-a-real-recognizer-binary".to_owned(),
            ..ToolSettings::default()
        });

        let err = tools.recognize(Path::new("nothing.png")).unwrap_err();

        assert!(matches!(
            err,
            ToolError::Spawn {
                tool: ToolKind::Recognizer,
                ..
            }
        ));
        assert!(tools.locate(ToolKind::Recognizer).is_err());
    }

    #[test]
    fn tool_names_read_naturally() {
        assert_eq!(ToolKind::ImageProcessor.to_string(), "image processor");
    }
}
