use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::Result;

pub mod configuration;
pub mod logging;
pub mod progress;

pub const DEFAULT_CONFIG_PATH: &str = "./screentext.json";
pub const DEFAULT_LOG_PATH: &str = "./logs/screentext.log";
/// Overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "SCREENTEXT_CONFIG";
/// Overrides [`DEFAULT_LOG_PATH`].
pub const LOG_PATH_ENV: &str = "SCREENTEXT_LOG";

/// Absolute log file path: `override_path` or [`DEFAULT_LOG_PATH`], with
/// relative paths taken from `cwd`.
#[inline]
pub fn log_path(cwd: &Path, override_path: Option<OsString>) -> Result<PathBuf> {
    let path = override_path.map_or_else(|| PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from);
    Ok(path_abs::PathAbs::new(cwd.join(path))?.as_path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::log_path;

    #[test]
    fn default_log_lives_under_cwd() {
        let cwd = Path::new("/srv/capture");

        let path = log_path(cwd, None).unwrap();

        assert_eq!(path, cwd.join("logs/screentext.log"));
        assert!(path.is_absolute());
    }

    #[test]
    fn relative_override_is_rooted_at_cwd() {
        let cwd = Path::new("/srv/capture");

        assert_eq!(
            log_path(cwd, Some("runs/today.log".into())).unwrap(),
            cwd.join("runs/today.log")
        );
        assert_eq!(
            log_path(cwd, Some("/var/log/screentext.log".into())).unwrap(),
            Path::new("/var/log/screentext.log")
        );
    }
}
