//! Crawl progress reporting.
//!
//! Progress goes to **stderr** so stdout stays parseable when `--json` is used.

use crate::crawler::util::truncate_with_ellipsis;
use std::io::Write;

const BAR_WIDTH: usize = 30;
const NAME_WIDTH: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    /// `n` of `total` submissions looked at; `challenge` is the one just handled.
    Advanced {
        n: usize,
        total: usize,
        challenge: String,
    },
    Finished {
        total: usize,
    },
}

pub trait ProgressReporter {
    fn report(&self, event: ProgressEvent);
}

/// Single-line bar redrawn in place: `Crawling solutions [=====-----] 50% [5/10] Two Sum`.
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: ProgressEvent) {
        let line = match &event {
            ProgressEvent::Advanced { n, total, challenge } => format!(
                "\r{} {}",
                render_bar(*n, *total),
                truncate_with_ellipsis(challenge, NAME_WIDTH)
            ),
            ProgressEvent::Finished { total } => {
                format!("\r{} done\n", render_bar(*total, *total))
            }
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _event: ProgressEvent) {}
}

fn render_bar(n: usize, total: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (n as f64 / total as f64).clamp(0.0, 1.0)
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!(
        "Crawling solutions [{}{}] {}% [{n}/{total}]",
        "=".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        (ratio * 100.0) as u32
    )
}
