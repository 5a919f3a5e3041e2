//! Core image processing: decode, resize, encode, write

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, PhotoResizeError, ErrorContext};

pub mod resize;
pub mod formats;

pub use resize::*;
pub use formats::*;

/// Processes one file at a time, writing the result next to its siblings
/// in the output directory.
pub struct ProcessingEngine {
    resizer: ImageResizer,
}

impl ProcessingEngine {
    /// Create a new processing engine
    pub fn new() -> Self {
        Self {
            resizer: ImageResizer::new(),
        }
    }

    /// Resize `input_path` into `output_dir/<file name>`.
    ///
    /// The output is only created once the image has been decoded, resized
    /// and encoded in memory; `output_dir` is created on demand right before
    /// the write.
    pub fn process_file(&self, input_path: &Path, output_dir: &Path) -> Result<ProcessedImage> {
        let start_time = Instant::now();
        debug!("Processing file: {:?}", input_path);

        let file_name = input_path.file_name().ok_or_else(|| {
            PhotoResizeError::unsupported_format("no file name", Some(input_path.to_path_buf()))
        })?;
        let output_path = output_dir.join(file_name);

        let (original, encoded) = {
            let (image, format) = self.load_image(input_path)?;
            let original = (image.width(), image.height());

            let resized = self.resizer.resize(image);
            let encoded = encode_image(&resized, format)
                .with_file_context(input_path.to_path_buf())?;

            (
                ImageInfo::new(original.0, original.1, format),
                EncodedImage {
                    info: ImageInfo::new(resized.width(), resized.height(), format),
                    bytes: encoded,
                },
            )
        };

        fs::create_dir_all(output_dir)?;
        write_output(&output_path, &encoded.bytes)?;

        debug!(
            "Saved {:?}: {}x{} -> {}x{} ({} bytes)",
            output_path,
            original.width,
            original.height,
            encoded.info.width,
            encoded.info.height,
            encoded.bytes.len()
        );

        Ok(ProcessedImage {
            input_path: input_path.to_path_buf(),
            output_path,
            original,
            output: encoded.info,
            file_size: encoded.bytes.len() as u64,
            processing_time: start_time.elapsed(),
        })
    }

    /// Decode an image, sniffing the container from its content first and
    /// falling back to the file extension.
    fn load_image(&self, path: &Path) -> Result<(image::DynamicImage, ImageFormat)> {
        // `open` guesses from the extension; content sniffing overrides it
        let reader = image::io::Reader::open(path)?.with_guessed_format()?;
        let detected = reader.format().ok_or_else(|| {
            PhotoResizeError::unsupported_format("Unknown", Some(path.to_path_buf()))
        })?;
        let format = ImageFormat::from_decoded(detected)
            .with_file_context(path.to_path_buf())?;

        let image = reader.decode()?;
        debug!("Decoded {:?} as {:?}: {}x{}", path, format, image.width(), image.height());

        Ok((image, format))
    }
}

impl Default for ProcessingEngine {
    fn default() -> Self {
        Self::new()
    }
}

struct EncodedImage {
    info: ImageInfo,
    bytes: Vec<u8>,
}

/// Encode into memory so that a failed encode never leaves a file behind
fn encode_image(image: &image::DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::from(format))?;
    Ok(buffer.into_inner())
}

/// Write the encoded bytes, removing the file again if the write fails part way
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, bytes) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

/// Dimensions and container of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32, format: ImageFormat) -> Self {
        Self { width, height, format }
    }
}

/// Result of processing one image
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedImage {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub input_path: PathBuf,
    #[serde(serialize_with = "lossy_path::serialize")]
    pub output_path: PathBuf,
    pub original: ImageInfo,
    pub output: ImageInfo,
    pub file_size: u64,
    #[serde(with = "duration_millis")]
    pub processing_time: Duration,
}

impl ProcessedImage {
    /// Whether the image had to be scaled down
    pub fn was_resized(&self) -> bool {
        self.original.width != self.output.width || self.original.height != self.output.height
    }
}

/// Paths are reported as text even when they are not valid UTF-8
pub(crate) mod lossy_path {
    use serde::Serializer;
    use std::path::Path;

    pub fn serialize<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&path.to_string_lossy())
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
