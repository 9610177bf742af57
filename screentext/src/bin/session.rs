use std::{env, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use screentext::{
    configuration::Configuration,
    log_path,
    logging::init_logging,
    LOG_PATH_ENV,
};
use screentext_core::session::merge_session;
use tracing::{error, level_filters::LevelFilter};

#[derive(Parser)]
#[command(
    name = "screentext-session",
    about = "Combines session logs, screen text, chat transcript and screenshots into \
             session_data.json.",
    version
)]
pub struct SessionCli {
    /// Directory holding the session files. Defaults to the configured
    /// session input directory.
    pub input_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = SessionCli::parse();
    let cwd = env::current_dir()?;
    let logs = log_path(&cwd, env::var_os(LOG_PATH_ENV))?;
    init_logging(LevelFilter::INFO, &logs, LevelFilter::DEBUG)?;

    let mut settings = Configuration::from_env(&cwd)?.session;
    if let Some(input_dir) = cli.input_dir {
        settings.input_dir = path_abs::PathAbs::new(input_dir)?.as_path().to_path_buf();
    }

    merge_session(&settings).inspect_err(|e| error!("{e}"))?;

    Ok(())
}
