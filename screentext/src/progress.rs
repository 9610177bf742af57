use std::{sync::mpsc::Receiver, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use screentext_core::progress::{ProcessCompletion, ProcessStatus};

const FRAMES_TEMPLATE: &str = "{msg} [{elapsed_precise}] [{wide_bar}] {pos}/{len} frames";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} [{elapsed_precise}]";

/// Draws pipeline progress until the sending side hangs up.
#[inline]
pub fn render_progress(rx: &Receiver<ProcessStatus>) {
    let mut bar: Option<(String, ProgressBar)> = None;

    for status in rx {
        match status {
            ProcessStatus::Processing {
                id,
                completion,
            } => {
                let current = match bar.take() {
                    Some((current_id, current)) if current_id == id => current,
                    Some((_, previous)) => {
                        previous.finish_and_clear();
                        new_bar(&id, &completion)
                    },
                    None => new_bar(&id, &completion),
                };
                if let ProcessCompletion::Frames {
                    completed,
                    total,
                } = completion
                {
                    current.set_length(total);
                    current.set_position(completed);
                }
                bar = Some((id, current));
            },
            ProcessStatus::Completed {
                ..
            } => {
                if let Some((_, current)) = bar.take() {
                    current.finish_and_clear();
                }
            },
            ProcessStatus::Failed {
                ..
            } => {
                if let Some((_, current)) = bar.take() {
                    current.abandon();
                }
            },
        }
    }

    if let Some((_, current)) = bar {
        current.finish_and_clear();
    }
}

fn new_bar(id: &str, completion: &ProcessCompletion) -> ProgressBar {
    let bar = match completion {
        ProcessCompletion::Indeterminate => {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        },
        ProcessCompletion::Frames {
            total, ..
        } => {
            let bar = ProgressBar::new(*total);
            if let Ok(style) = ProgressStyle::with_template(FRAMES_TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        },
    };
    bar.set_message(id.to_owned());
    bar
}
