use std::{fs, io, path::Path};

use anyhow::{anyhow, Result};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Console output at `console_level`, and a plain-text log file at
/// `file_level`. `RUST_LOG` overrides both.
#[inline]
pub fn init_logging(console_level: LevelFilter, log_path: &Path, file_level: LevelFilter) -> Result<()> {
    let directory = log_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", log_path.display()))?;
    fs::create_dir_all(directory)?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let console_filter =
        EnvFilter::builder().with_default_directive(console_level.into()).from_env_lossy();
    let file_filter = EnvFilter::builder().with_default_directive(file_level.into()).from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .try_init()?;

    Ok(())
}
