//! PhotoResize - resize every image in a directory
//!
//! Scales each image file found directly inside a directory so that its
//! longest side is at most 800 pixels, and writes the results into a
//! `Resized` subdirectory under the same file names. The work runs on a
//! background worker that reports progress to the interactive front end
//! through messages.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use photoresize::ui::{App, ProgressView};
//!
//! # async fn run() -> photoresize::Result<()> {
//! let mut app = App::new(ProgressView::new());
//! app.set_directory("/home/me/Pictures/holiday");
//! app.start_resize()?;
//!
//! let report = app.wait_for_completion().await?;
//! println!("{} resized, {} skipped", report.processed_count(), report.skipped_count());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod error;
pub mod processing;
pub mod ui;

// Re-export commonly used types
pub use batch::{BatchReport, BatchResizer, EntryOutcome, ResizeJob, SkipReason};
pub use config::{Config, LoggingConfig, OUTPUT_DIR_NAME, TARGET_SIZE};
pub use error::{Result, PhotoResizeError};
pub use processing::ProcessingEngine;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from `RUST_LOG` (defaults to `info`).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install_subscriber(filter, false);
    Ok(())
}

/// Initialize logging with the given configuration
pub fn init_with_config(config: &Config) -> Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.logging.level)
        .map_err(|e| PhotoResizeError::config(format!("Invalid log filter: {}", e)))?;
    install_subscriber(filter, config.logging.json_format);

    Ok(())
}

fn install_subscriber(filter: EnvFilter, json: bool) {
    // stdout is reserved for the report
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
    } else {
        tracing::subscriber::set_global_default(builder.finish()).is_ok()
    };

    if installed {
        info!("PhotoResize v{} initialized", VERSION);
    }
}
