//! Directory selection

use std::io;
use std::path::{Path, PathBuf};
use console::{style, Term};
use rfd::FileDialog;

use crate::error::Result;

/// Title shown by every directory prompt
pub const PROMPT_TITLE: &str = "Choose Directory";

/// Something that can ask the user for a directory
pub trait FolderPrompt {
    /// Ask once; `None` when the user cancels
    fn prompt(&mut self, title: &str) -> Result<Option<PathBuf>>;
}

/// The platform's native folder picker; closing it cancels
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPrompt;

impl FolderPrompt for DialogPrompt {
    fn prompt(&mut self, title: &str) -> Result<Option<PathBuf>> {
        Ok(FileDialog::new().set_title(title).pick_folder())
    }
}

/// Whether this session can show a native dialog at all
pub fn dialog_available() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Prompts on the terminal for headless sessions; an empty line or end of
/// input cancels
pub struct ConsolePrompt {
    term: Term,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self { term: Term::stderr() }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderPrompt for ConsolePrompt {
    fn prompt(&mut self, title: &str) -> Result<Option<PathBuf>> {
        self.term.write_str(&format!("{}: ", style(title).bold()))?;

        let line = match self.term.read_line() {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(trimmed)))
    }
}

/// Presents a prompt and turns the answer into an absolute path.
///
/// The directory's contents are not checked here.
pub struct DirectorySelector<P: FolderPrompt> {
    prompt: P,
}

impl<P: FolderPrompt> DirectorySelector<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    /// Returns the chosen directory, or `None` if the user cancelled
    pub fn choose(&mut self) -> Result<Option<PathBuf>> {
        self.prompt
            .prompt(PROMPT_TITLE)?
            .map(|path| absolute_path(&path))
            .transpose()
    }
}

/// Resolve `path` against the current directory when it is relative
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
