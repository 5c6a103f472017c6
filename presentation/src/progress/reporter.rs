//! Live transcript reporter
//!
//! Streams the deliberation/execution transcript to the console as the
//! fragments arrive: a spinner while connecting, then colored per-speaker
//! headers with the text printed incrementally.

use std::io::Write;
use std::sync::Mutex;

use colored::Colorize;
use council_application::ports::observer::SessionObserver;
use council_domain::{Phase, SessionStatus, Speaker};
use indicatif::{ProgressBar, ProgressStyle};

/// Prints the live transcript of a streaming session.
pub struct TranscriptReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TranscriptReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message("Convening the council...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        Self {
            spinner: Mutex::new(Some(spinner)),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().unwrap().take() {
            spinner.finish_and_clear();
        }
    }

    fn phase_title(phase: Phase) -> &'static str {
        match phase {
            Phase::Deliberation => "Board Deliberation",
            Phase::Execution => "Execution Squad",
        }
    }
}

impl Default for TranscriptReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for TranscriptReporter {
    fn on_session_open(&self, phase: Phase) {
        self.clear_spinner();
        println!(
            "\n{} {}",
            format!("── {} ──", Self::phase_title(phase)).cyan().bold(),
            "LIVE".red().bold()
        );
    }

    fn on_speaker_change(&self, speaker: &Speaker) {
        let name = if speaker.is_system() {
            speaker.as_str().red().bold()
        } else {
            speaker.as_str().yellow().bold()
        };
        println!("\n{}", name);
    }

    fn on_delta(&self, _speaker: &Speaker, delta: &str) {
        print!("{delta}");
        let _ = std::io::stdout().flush();
    }

    fn on_session_end(&self, phase: Phase, status: &SessionStatus) {
        self.clear_spinner();
        let label = match status {
            SessionStatus::Completed => "completed".green().bold(),
            SessionStatus::Errored => "errored".red().bold(),
            _ => "closed".dimmed(),
        };
        println!(
            "\n\n{} {}",
            format!("── {} ──", Self::phase_title(phase)).cyan().bold(),
            label
        );
    }
}
