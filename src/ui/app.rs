//! UI state and the message loop that applies worker updates

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::batch::{BatchReport, BatchResizer, ChannelReporter, ProgressState, ResizeJob, UiMessage};
use crate::error::{Result, PhotoResizeError};
use crate::ui::selector::{DirectorySelector, FolderPrompt};
use crate::ui::view::ProgressView;
use crate::ui::TriggerState;

/// Owns everything the user sees. Only the task driving the `App` mutates
/// it; the resize worker talks to it through `UiMessage`s.
pub struct App {
    directory: Option<PathBuf>,
    trigger: TriggerState,
    progress: ProgressState,
    view: ProgressView,
    resizer: Arc<BatchResizer>,
    sender: mpsc::UnboundedSender<UiMessage>,
    receiver: mpsc::UnboundedReceiver<UiMessage>,
}

impl App {
    pub fn new(view: ProgressView) -> Self {
        Self::with_resizer(view, BatchResizer::new())
    }

    pub fn with_resizer(view: ProgressView, resizer: BatchResizer) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            directory: None,
            trigger: TriggerState::Enabled,
            progress: ProgressState::default(),
            view,
            resizer: Arc::new(resizer),
            sender,
            receiver,
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Contents of the directory field
    pub fn directory_text(&self) -> String {
        self.directory
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default()
    }

    /// Edit the directory field directly
    pub fn set_directory<P: Into<PathBuf>>(&mut self, directory: P) {
        let directory = directory.into();
        debug!("Directory set to {:?}", directory);
        self.directory = Some(directory);
    }

    /// Run the directory prompt; a cancelled prompt leaves the field as it was.
    /// Returns whether the field changed.
    pub fn choose_directory<P: FolderPrompt>(&mut self, selector: &mut DirectorySelector<P>) -> Result<bool> {
        match selector.choose()? {
            Some(directory) => {
                self.set_directory(directory);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn trigger(&self) -> TriggerState {
        self.trigger
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    /// Start resizing the selected directory in the background.
    ///
    /// Disables the trigger before the worker is spawned. Must be called from
    /// within a Tokio runtime.
    pub fn start_resize(&mut self) -> Result<()> {
        if !self.trigger.is_enabled() {
            return Err(PhotoResizeError::Busy);
        }
        let directory = self
            .directory
            .clone()
            .ok_or_else(|| PhotoResizeError::config("No directory selected"))?;

        self.set_trigger(TriggerState::Disabled);

        let job = ResizeJob::new(directory);
        info!("Starting resize of {:?}", job.input_dir());

        let resizer = Arc::clone(&self.resizer);
        let reporter = ChannelReporter::new(self.sender.clone());
        let worker = tokio::task::spawn_blocking(move || resizer.resize_all(&job, &reporter));

        // Sent after the worker returned, so it trails every progress message.
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = match worker.await {
                Ok(result) => result,
                Err(e) => Err(PhotoResizeError::system(format!("Resize worker failed: {}", e))),
            };
            let _ = sender.send(UiMessage::RunFinished(result));
        });

        Ok(())
    }

    /// Apply one message. Returns the run result once the run has finished.
    pub fn handle_message(&mut self, message: UiMessage) -> Option<Result<BatchReport>> {
        match message {
            UiMessage::SetupProgress(total) => {
                self.progress.setup(total);
                self.view.render(&self.progress);
                None
            }
            UiMessage::IncrementProgress => {
                self.progress.increment();
                self.view.render(&self.progress);
                None
            }
            UiMessage::RunFinished(result) => {
                self.view.finish();
                self.set_trigger(TriggerState::Enabled);
                Some(result)
            }
        }
    }

    /// Wait for and apply the next message
    pub async fn step(&mut self) -> Option<Result<BatchReport>> {
        match self.receiver.recv().await {
            Some(message) => self.handle_message(message),
            None => Some(Err(PhotoResizeError::system("UI message channel closed"))),
        }
    }

    /// Drain messages until the current run finishes
    pub async fn wait_for_completion(&mut self) -> Result<BatchReport> {
        if self.trigger.is_enabled() {
            return Err(PhotoResizeError::config("No resize run in progress"));
        }

        loop {
            if let Some(result) = self.step().await {
                return result;
            }
        }
    }

    fn set_trigger(&mut self, trigger: TriggerState) {
        self.trigger = trigger;
        self.view.render_trigger(trigger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::selector::tests::ScriptedPrompt;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn app() -> App {
        App::new(ProgressView::hidden())
    }

    fn populate(dir: &Path) {
        ImageBuffer::from_pixel(1600, 1200, Rgb([1u8, 2, 3]))
            .save(dir.join("a.jpg"))
            .unwrap();
        ImageBuffer::from_pixel(400, 300, Rgb([4u8, 5, 6]))
            .save(dir.join("b.png"))
            .unwrap();
        std::fs::write(dir.join("notes.txt"), "not an image").unwrap();
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.trigger(), TriggerState::Enabled);
        assert_eq!(app.progress(), ProgressState::default());
        assert_eq!(app.directory_text(), "");
    }

    #[test]
    fn test_choose_directory_updates_field() {
        let mut app = app();
        let dir = std::env::temp_dir();
        let mut selector = DirectorySelector::new(ScriptedPrompt::new(vec![Some(dir.clone()), None]));

        assert!(app.choose_directory(&mut selector).unwrap());
        assert_eq!(app.directory(), Some(dir.as_path()));

        // cancelling keeps the previous choice
        assert!(!app.choose_directory(&mut selector).unwrap());
        assert_eq!(app.directory(), Some(dir.as_path()));
    }

    #[tokio::test]
    async fn test_start_without_directory() {
        let mut app = app();
        assert!(matches!(app.start_resize(), Err(PhotoResizeError::ConfigError { .. })));
        assert_eq!(app.trigger(), TriggerState::Enabled);
    }

    #[tokio::test]
    async fn test_wait_without_run() {
        let mut app = app();
        assert!(app.wait_for_completion().await.is_err());
    }

    #[tokio::test]
    async fn test_full_run_messages_and_trigger() {
        let dir = TempDir::new().unwrap();
        populate(dir.path());

        let mut app = app();
        app.set_directory(dir.path());
        app.start_resize().unwrap();
        assert_eq!(app.trigger(), TriggerState::Disabled);

        // second trigger while running is rejected
        assert!(matches!(app.start_resize(), Err(PhotoResizeError::Busy)));

        let mut increments = 0;
        let report = loop {
            let message = app.receiver.recv().await.unwrap();
            match &message {
                UiMessage::SetupProgress(total) => {
                    assert_eq!(*total, 3);
                    assert_eq!(increments, 0);
                }
                UiMessage::IncrementProgress => increments += 1,
                UiMessage::RunFinished(_) => assert_eq!(increments, 3),
            }
            if let Some(result) = app.handle_message(message) {
                break result.unwrap();
            }
            assert_eq!(app.trigger(), TriggerState::Disabled);
        };

        assert_eq!(app.trigger(), TriggerState::Enabled);
        assert_eq!(app.progress(), ProgressState { maximum: 3, value: 3 });
        assert_eq!(report.processed_count(), 2);
        assert_eq!(report.skipped_count(), 1);
    }

    #[tokio::test]
    async fn test_run_error_reenables_trigger() {
        let dir = TempDir::new().unwrap();
        let mut app = app();
        app.set_directory(dir.path().join("missing"));
        app.start_resize().unwrap();

        let result = app.wait_for_completion().await;
        assert!(matches!(result, Err(PhotoResizeError::DirectoryError { .. })));
        assert_eq!(app.trigger(), TriggerState::Enabled);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let dir = TempDir::new().unwrap();
        populate(dir.path());
        let mut app = app();
        app.set_directory(dir.path());

        app.start_resize().unwrap();
        let first = app.wait_for_completion().await.unwrap();

        app.start_resize().unwrap();
        let second = app.wait_for_completion().await.unwrap();

        // `Resized` is a directory, so it is not an entry of the second run
        assert_eq!(first.total_entries, second.total_entries);

        let mut names: Vec<_> = std::fs::read_dir(dir.path().join("Resized"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg".to_string(), "b.png".to_string()]);
    }
}
