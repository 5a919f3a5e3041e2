//! Image container formats that survive a resize round trip

use serde::Serialize;
use crate::error::{Result, PhotoResizeError};

/// Container formats the resizer can read and write back unchanged
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
}

impl ImageFormat {
    /// Map a decoder-reported format onto one we can encode again
    pub fn from_decoded(format: image::ImageFormat) -> Result<Self> {
        match format {
            image::ImageFormat::Jpeg => Ok(Self::Jpeg),
            image::ImageFormat::Png => Ok(Self::Png),
            image::ImageFormat::Gif => Ok(Self::Gif),
            image::ImageFormat::Bmp => Ok(Self::Bmp),
            image::ImageFormat::Tiff => Ok(Self::Tiff),
            image::ImageFormat::WebP => Ok(Self::WebP),
            other => Err(PhotoResizeError::unsupported_format(
                format!("{:?}", other),
                None,
            )),
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}
