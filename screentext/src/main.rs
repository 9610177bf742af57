use std::{
    env,
    panic,
    path::PathBuf,
    process,
    sync::mpsc,
    thread,
};

use anyhow::Result;
use clap::Parser;
use screentext::{
    configuration::Configuration,
    log_path,
    logging::init_logging,
    progress::render_progress,
    LOG_PATH_ENV,
};
use screentext_core::{progress::ProgressSink, select_video, ExternalTools, Pipeline};
use tracing::{error, info, level_filters::LevelFilter};

#[derive(Parser)]
#[command(
    name = "screentext",
    about = "Extracts on-screen text from a screen recording, one labeled section per second of \
             video.",
    version
)]
pub struct ScreenTextCli {
    /// Recording to process. Relative names are resolved against the
    /// configured video directory. Defaults to the most recently modified
    /// recording there.
    pub video: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let orig_hook = panic::take_hook();
    // Catch panics in the progress thread
    panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        process::exit(1);
    }));
    run()
}

fn run() -> Result<()> {
    let cli = ScreenTextCli::parse();
    let cwd = env::current_dir()?;
    let logs = log_path(&cwd, env::var_os(LOG_PATH_ENV))?;
    init_logging(LevelFilter::INFO, &logs, LevelFilter::DEBUG)?;

    let settings = Configuration::from_env(&cwd)?.pipeline;

    let video = select_video(
        cli.video.as_deref(),
        &settings.video_dir,
        &settings.video_extension,
    )
    .inspect_err(|e| error!("{e}"))?;

    let tools = ExternalTools::new(settings.tools.clone());
    tools.check_frame_tools();

    let (tx, rx) = mpsc::channel();
    let report = thread::scope(|scope| {
        let renderer = scope.spawn(move || render_progress(&rx));

        let mut pipeline = Pipeline::new(settings, tools).with_progress(ProgressSink::new(tx));
        let result = pipeline.run(&video);
        // Hang up the channel so the renderer can finish.
        drop(pipeline);

        let _ = renderer.join();
        result
    })?;

    info!(
        "Done: {} frame(s), {} failed. Output: {}",
        report.frames(),
        report.failed_frames(),
        report.output_path.display()
    );

    Ok(())
}
