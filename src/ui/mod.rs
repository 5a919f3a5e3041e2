//! Interactive front end: directory field, folder picker, resize trigger, progress bar

pub mod app;
pub mod selector;
pub mod view;

pub use app::App;
pub use selector::{
    absolute_path, dialog_available, ConsolePrompt, DialogPrompt, DirectorySelector, FolderPrompt,
};
pub use view::ProgressView;

/// Whether the resize action can be triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Enabled,
    /// A run is in progress
    Disabled,
}

impl TriggerState {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}
