//! Bundles a capture session into one JSON file: both machines' shell
//! logs, the aggregated screen text, the chat transcript and the list of
//! screenshots taken during the session.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{selector::has_extension, SCREEN_TEXT_FILE_NAME};

pub const WINDOWS_LOG_FILE_NAME: &str = "session_windows.log";
pub const LINUX_LOG_FILE_NAME: &str = "session_linux.log";
pub const CHAT_TRANSCRIPT_FILE_NAME: &str = "chattranscript.txt";
pub const SESSION_DATA_FILE_NAME: &str = "session_data.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
    pub input_dir:            PathBuf,
    pub project:              String,
    pub part:                 String,
    pub screenshot_extension: String,
}

impl Default for SessionSettings {
    #[inline]
    fn default() -> Self {
        Self {
            input_dir:            PathBuf::from("./input"),
            project:              String::new(),
            part:                 String::new(),
            screenshot_extension: "png".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub project:         String,
    pub part:            String,
    pub windows_log:     String,
    pub linux_log:       String,
    pub screen_text:     String,
    pub screenshots:     Vec<String>,
    pub chat_transcript: String,
}

impl SessionData {
    /// Collects whatever session files exist in `settings.input_dir`.
    /// Missing files become empty strings.
    #[inline]
    pub fn collect(settings: &SessionSettings) -> Result<Self, SessionError> {
        let dir = &settings.input_dir;
        if !dir.is_dir() {
            return Err(SessionError::MissingInputDir(dir.clone()));
        }

        Ok(Self {
            project:         settings.project.clone(),
            part:            settings.part.clone(),
            windows_log:     read_if_exists(dir, WINDOWS_LOG_FILE_NAME)?,
            linux_log:       read_if_exists(dir, LINUX_LOG_FILE_NAME)?,
            screen_text:     read_if_exists(dir, SCREEN_TEXT_FILE_NAME)?,
            screenshots:     screenshots(dir, &settings.screenshot_extension)?,
            chat_transcript: read_if_exists(dir, CHAT_TRANSCRIPT_FILE_NAME)?,
        })
    }

    #[inline]
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Collects the session and writes `session_data.json` next to its inputs.
#[inline]
pub fn merge_session(settings: &SessionSettings) -> Result<(SessionData, PathBuf), SessionError> {
    info!("Reading session files from {}", settings.input_dir.display());
    let data = SessionData::collect(settings)?;
    info!("Found {} screenshot(s)", data.screenshots.len());

    let output = settings.input_dir.join(SESSION_DATA_FILE_NAME);
    data.save(&output)?;
    info!("Combined session data written to {}", output.display());

    Ok((data, output))
}

fn read_if_exists(dir: &Path, name: &str) -> Result<String, SessionError> {
    let path = dir.join(name);
    // Terminal captures may hold bytes that are not UTF-8.
    match fs::read(&path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).trim().to_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Missing: {name}");
            Ok(String::new())
        },
        Err(source) => Err(SessionError::Io {
            path,
            source,
        }),
    }
}

fn screenshots(dir: &Path, extension: &str) -> Result<Vec<String>, SessionError> {
    let io_err = |source| SessionError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && has_extension(&path, extension) {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().into_owned());
            }
        }
    }

    Ok(names.into_iter().sorted().collect())
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session input directory {0} does not exist")]
    MissingInputDir(PathBuf),
    #[error("Cannot access {path}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot serialize session data: {0}")]
    Serialize(#[from] serde_json::Error),
}
