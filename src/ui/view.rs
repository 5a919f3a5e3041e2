//! Terminal rendering of the progress indicator

use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::ProgressState;
use crate::ui::TriggerState;

/// Bounded progress bar mirroring the UI's `ProgressState`
pub struct ProgressView {
    bar: ProgressBar,
}

impl ProgressView {
    /// A bar drawn on stderr
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    /// A bar that never draws (quiet and JSON modes, tests)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn render(&self, state: &ProgressState) {
        self.bar.set_length(state.maximum);
        self.bar.set_position(state.value);
        self.bar.set_message(state.status_text());
    }

    pub fn render_trigger(&self, trigger: TriggerState) {
        match trigger {
            TriggerState::Disabled => self.bar.set_prefix("Resizing"),
            TriggerState::Enabled => self.bar.set_prefix(""),
        }
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }
}

impl Default for ProgressView {
    fn default() -> Self {
        Self::new()
    }
}
