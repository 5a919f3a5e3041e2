//! Error types and handling for PhotoResize

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for PhotoResize operations
pub type Result<T> = std::result::Result<T, PhotoResizeError>;

/// Main error type for PhotoResize operations
#[derive(Debug, Error)]
pub enum PhotoResizeError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Image container that cannot be decoded or written back
    #[error("Unsupported image format: {format} (file: {file:?})")]
    UnsupportedFormat {
        format: String,
        file: Option<PathBuf>,
    },

    /// The input directory could not be listed
    #[error("Cannot read directory {dir:?}: {source}")]
    DirectoryError {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resize run is already in progress
    #[error("A resize run is already in progress")]
    Busy,

    /// Background worker failures
    #[error("System error: {message}")]
    SystemError { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl PhotoResizeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S, file: Option<PathBuf>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            file,
        }
    }

    /// Create a new directory listing error
    pub fn directory(dir: PathBuf, source: std::io::Error) -> Self {
        Self::DirectoryError { dir, source }
    }

    /// Create a new system error
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::SystemError {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File system error: {}", e),
            Self::ImageError(e) => format!("Image processing failed: {}", e),
            Self::UnsupportedFormat { format, .. } => {
                format!("Unsupported image format: {}. Supported formats: JPEG, PNG, GIF, BMP, TIFF, WebP", format)
            }
            Self::DirectoryError { dir, source } => {
                format!("Could not read the directory {}: {}", dir.display(), source)
            }
            Self::Busy => "Resizing is already running. Wait for it to finish.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for PhotoResizeError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {}", err))
    }
}

impl From<serde_yaml::Error> for PhotoResizeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {}", err))
    }
}

/// Error context extension for adding file path information
pub trait ErrorContext<T> {
    /// Add file context to an error
    fn with_file_context(self, file: PathBuf) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<PhotoResizeError>,
{
    fn with_file_context(self, file: PathBuf) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();

            if let PhotoResizeError::UnsupportedFormat { file: ref mut f, .. } = error {
                if f.is_none() {
                    *f = Some(file);
                }
            }

            error
        })
    }
}
