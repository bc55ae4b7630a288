use std::sync::OnceLock;
use std::time::Duration;

use camscout_core::Progress;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

/// The running spinner, if there is one that has not finished yet.
pub fn active() -> Option<&'static ProgressBar> {
    SPINNER.get().filter(|pb| !pb.is_finished())
}

pub fn start() -> &'static ProgressBar {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn finish() {
    if let Some(pb) = SPINNER.get() {
        pb.finish_and_clear();
    }
}

pub fn report_progress(progress: Progress) {
    if let Some(pb) = active() {
        pb.set_message(progress_message(&progress));
    }
}

fn progress_message(progress: &Progress) -> String {
    match progress {
        Progress::Discovering => "Probing for ONVIF devices...".to_string(),
        Progress::Discovered { candidates } => format!(
            "{} devices answered the probe",
            candidates.to_string().green().bold()
        ),
        Progress::Querying {
            address,
            index,
            total,
        } => format!(
            "Querying {} ({}/{})",
            address.bold(),
            index + 1,
            total
        ),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
