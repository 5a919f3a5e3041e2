//! Progress reporting from the resize worker to the UI loop

use tokio::sync::mpsc;
use tracing::trace;

use crate::batch::BatchReport;
use crate::error::Result;

/// Callbacks the batch resizer invokes while it works.
///
/// Implementations must be callable from the worker thread.
pub trait ProgressReporter: Send + Sync {
    /// Set the bound to `total` and the current value to zero
    fn setup_progress(&self, total: u64);

    /// Advance the current value by one
    fn increment_progress(&self);
}

/// Messages delivered to the UI loop, in the order they were sent
#[derive(Debug)]
pub enum UiMessage {
    SetupProgress(u64),
    IncrementProgress,
    /// The worker has returned; always the last message of a run
    RunFinished(Result<BatchReport>),
}

/// Forwards progress callbacks onto the UI loop's channel
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<UiMessage>,
}

impl ChannelReporter {
    pub fn new(sender: mpsc::UnboundedSender<UiMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelReporter {
    fn setup_progress(&self, total: u64) {
        trace!("setup_progress({})", total);
        // A closed channel means the UI is gone; nothing left to update.
        let _ = self.sender.send(UiMessage::SetupProgress(total));
    }

    fn increment_progress(&self) {
        let _ = self.sender.send(UiMessage::IncrementProgress);
    }
}

/// Bounded progress counter owned by the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub maximum: u64,
    pub value: u64,
}

impl ProgressState {
    pub fn setup(&mut self, total: u64) {
        self.maximum = total;
        self.value = 0;
    }

    /// Advance by one; the value never passes the bound
    pub fn increment(&mut self) {
        if self.value < self.maximum {
            self.value += 1;
        }
    }

    /// Get completion as a percentage
    pub fn completion_percentage(&self) -> f64 {
        if self.maximum == 0 {
            return 100.0;
        }
        (self.value as f64 / self.maximum as f64) * 100.0
    }

    /// Get human-readable completion status
    pub fn status_text(&self) -> String {
        format!(
            "{}/{} files processed ({:.0}%)",
            self.value,
            self.maximum,
            self.completion_percentage()
        )
    }
}
