//! Sequential batch resizing of a whole directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::OUTPUT_DIR_NAME;
use crate::error::{Result, PhotoResizeError};
use crate::processing::{lossy_path, ProcessingEngine, ProcessedImage};

pub mod progress;

pub use progress::*;

/// One resize run over a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeJob {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ResizeJob {
    /// Create a job; the output directory is always `<input_dir>/Resized`
    pub fn new<P: Into<PathBuf>>(input_dir: P) -> Self {
        let input_dir = input_dir.into();
        let output_dir = input_dir.join(OUTPUT_DIR_NAME);
        Self { input_dir, output_dir }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Why an entry produced no output
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// Not decodable as an image (includes non-image files)
    Decode(String),
    /// Decodable container that cannot be written back
    UnsupportedFormat(String),
    /// Encoder rejected the resized image
    Encode(String),
    /// Reading the input or writing the output failed
    Io(String),
}

impl SkipReason {
    fn from_error(error: PhotoResizeError) -> Self {
        match error {
            PhotoResizeError::UnsupportedFormat { format, .. } => Self::UnsupportedFormat(format),
            PhotoResizeError::ImageError(e) => match &e {
                image::ImageError::IoError(io) => Self::Io(io.to_string()),
                image::ImageError::Encoding(_) | image::ImageError::Parameter(_) => {
                    Self::Encode(e.to_string())
                }
                image::ImageError::Unsupported(_) => Self::UnsupportedFormat(e.to_string()),
                _ => Self::Decode(e.to_string()),
            },
            PhotoResizeError::IoError(e) => Self::Io(e.to_string()),
            other => Self::Io(other.to_string()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Decode(m) | Self::UnsupportedFormat(m) | Self::Encode(m) | Self::Io(m) => m,
        }
    }
}

/// An entry that was attempted but produced no output
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one directory entry
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Processed(ProcessedImage),
    Skipped(SkippedEntry),
}

/// Everything that happened during one run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub input_dir: PathBuf,
    #[serde(serialize_with = "lossy_path::serialize")]
    pub output_dir: PathBuf,
    pub total_entries: u64,
    pub outcomes: Vec<EntryOutcome>,
    #[serde(skip)]
    pub processing_time: Duration,
}

impl BatchReport {
    pub fn processed(&self) -> impl Iterator<Item = &ProcessedImage> {
        self.outcomes.iter().filter_map(|o| match o {
            EntryOutcome::Processed(p) => Some(p),
            EntryOutcome::Skipped(_) => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedEntry> {
        self.outcomes.iter().filter_map(|o| match o {
            EntryOutcome::Skipped(s) => Some(s),
            EntryOutcome::Processed(_) => None,
        })
    }

    pub fn processed_count(&self) -> usize {
        self.processed().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }

    /// Total bytes written to the output directory
    pub fn total_output_size(&self) -> u64 {
        self.processed().map(|p| p.file_size).sum()
    }
}

/// Resizes every file of a directory, one at a time
pub struct BatchResizer {
    engine: ProcessingEngine,
}

impl BatchResizer {
    pub fn new() -> Self {
        Self {
            engine: ProcessingEngine::new(),
        }
    }

    /// Resize every regular file directly inside the job's input directory.
    ///
    /// Blocks until the whole directory has been handled. Entries that fail
    /// are recorded as skipped; only a failure to list the directory ends
    /// the run early. Progress advances once per entry, processed or not.
    pub fn resize_all(&self, job: &ResizeJob, reporter: &dyn ProgressReporter) -> Result<BatchReport> {
        let start_time = Instant::now();
        info!("Resizing images in {:?} into {:?}", job.input_dir(), job.output_dir());

        let entries = list_entries(job.input_dir())?;
        let total_entries = entries.len() as u64;
        reporter.setup_progress(total_entries);

        let mut outcomes = Vec::with_capacity(entries.len());
        for path in entries {
            let outcome = match self.engine.process_file(&path, job.output_dir()) {
                Ok(processed) => EntryOutcome::Processed(processed),
                Err(error) => {
                    debug!("Skipping {:?}: {}", path, error);
                    EntryOutcome::Skipped(SkippedEntry {
                        path,
                        reason: SkipReason::from_error(error),
                    })
                }
            };
            outcomes.push(outcome);
            reporter.increment_progress();
        }

        let report = BatchReport {
            input_dir: job.input_dir().to_path_buf(),
            output_dir: job.output_dir().to_path_buf(),
            total_entries,
            outcomes,
            processing_time: start_time.elapsed(),
        };

        info!(
            "Resize run finished: {} processed, {} skipped in {:.2}s",
            report.processed_count(),
            report.skipped_count(),
            report.processing_time.as_secs_f64()
        );

        Ok(report)
    }
}

impl Default for BatchResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Regular files directly inside `dir`, in the order the filesystem yields them
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(dir)
        .map_err(|e| PhotoResizeError::directory(dir.to_path_buf(), e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| PhotoResizeError::directory(dir.to_path_buf(), e))?;
        let path = entry.path();
        if path.is_file() {
            entries.push(path);
        }
    }

    Ok(entries)
}
