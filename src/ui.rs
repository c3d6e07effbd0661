//! Console surface: an append-only log above a persistent latency line.
//!
//! Built on indicatif so log lines scroll past while the latency display
//! stays pinned at the bottom of the terminal.

use chrono::Local;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

pub struct Console {
    multi_progress: MultiProgress,
    latency_pb: ProgressBar,
}

impl Console {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Console that draws nothing, for tests.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);
        let latency_pb = multi_progress.add(ProgressBar::new_spinner());
        latency_pb.set_style(
            ProgressStyle::default_spinner()
                .template("{prefix:.bold.dim} {wide_msg}")
                .unwrap(),
        );
        latency_pb.set_prefix("Latency");
        latency_pb.set_message("no samples yet");
        Console {
            multi_progress,
            latency_pb,
        }
    }

    /// Appends a timestamped line above the latency display.
    pub fn log(&self, line: &str) {
        let stamp = Local::now().format("%H:%M:%S");
        let _ = self.multi_progress.println(format!("[{}] {}", stamp, line));
    }

    /// Updates the running-average display, rounded up to whole ms.
    pub fn set_latency(&self, average_ms: f64) {
        self.latency_pb
            .set_message(format!("{} ms", average_ms.ceil()));
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
