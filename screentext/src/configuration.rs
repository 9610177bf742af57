use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::Result;
use screentext_core::{session::SessionSettings, PipelineSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    pub pipeline: PipelineSettings,
    pub session:  SessionSettings,
}

impl Configuration {
    #[inline]
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buffer = vec![];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        std::fs::write(path, buffer)?;
        Ok(())
    }

    #[inline]
    pub fn load(config_path: &Path) -> Result<Option<Configuration>> {
        if !config_path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(config_path)
            .map_err(|_| ConfigError::ConfigLoadError(config_path.to_path_buf()))?;
        let data = serde_json::from_str(&data)
            .map_err(|_| ConfigError::ConfigLoadError(config_path.to_path_buf()))?;

        Ok(Some(data))
    }

    /// Picks the config file (`override_path` or [`DEFAULT_CONFIG_PATH`]),
    /// falls back to defaults when it does not exist and re-roots relative
    /// directories onto `cwd`.
    #[inline]
    pub fn discover(cwd: &Path, override_path: Option<OsString>) -> Result<Self> {
        let config_path = path_abs::PathAbs::new(
            override_path.map_or_else(|| cwd.join(DEFAULT_CONFIG_PATH), PathBuf::from),
        )?
        .as_path()
        .to_path_buf();

        let mut configuration = match Self::load(&config_path)? {
            Some(configuration) => {
                debug!("Loaded configuration from {}", config_path.display());
                configuration
            },
            None => {
                debug!("No configuration at {}, using defaults", config_path.display());
                Self::default()
            },
        };
        configuration.pipeline.resolve_relative_to(cwd);
        if configuration.session.input_dir.is_relative() {
            configuration.session.input_dir = cwd.join(&configuration.session.input_dir);
        }

        Ok(configuration)
    }

    /// [`Configuration::discover`] honouring [`CONFIG_PATH_ENV`].
    #[inline]
    pub fn from_env(cwd: &Path) -> Result<Self> {
        Self::discover(cwd, std::env::var_os(CONFIG_PATH_ENV))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    ConfigLoadError(PathBuf),
}
