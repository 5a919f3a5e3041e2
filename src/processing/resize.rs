//! Longest-side resizing

use image::DynamicImage;
use tracing::debug;

use crate::config::TARGET_SIZE;

/// Available resize filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Nearest neighbor (fastest, lowest quality)
    Nearest,
    /// Triangle (linear interpolation)
    Triangle,
    /// Catmull-Rom cubic spline
    CatmullRom,
    /// Lanczos with radius 3 (high quality, recommended)
    #[default]
    Lanczos3,
}

impl From<FilterType> for image::imageops::FilterType {
    fn from(filter: FilterType) -> Self {
        match filter {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Triangle => image::imageops::FilterType::Triangle,
            FilterType::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Scales images so that their longest side is at most `max_dimension`
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    max_dimension: u32,
    filter: FilterType,
}

impl ImageResizer {
    /// Create a resizer for the fixed target size
    pub fn new() -> Self {
        Self {
            max_dimension: TARGET_SIZE,
            filter: FilterType::Lanczos3,
        }
    }

    /// Use a different resampling filter
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Resize an image. Images that already fit are returned untouched.
    pub fn resize(&self, image: DynamicImage) -> DynamicImage {
        let (width, height) = (image.width(), image.height());
        let (target_width, target_height) = calculate_dimensions(width, height, self.max_dimension);

        if (target_width, target_height) == (width, height) {
            debug!("{}x{} already fits within {}px, keeping size", width, height, self.max_dimension);
            return image;
        }

        debug!(
            "Resizing {}x{} -> {}x{} using {:?}",
            width, height, target_width, target_height, self.filter
        );

        image.resize_exact(target_width, target_height, self.filter.into())
    }
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dimensions after scaling the longest side down to `max_dimension`.
///
/// The shorter side is scaled by the same factor and rounded to the nearest
/// pixel (never below 1). Images that already fit are never upscaled.
pub fn calculate_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || longest == 0 {
        return (width, height);
    }

    let scale = |side: u32| -> u32 {
        let scaled = (u64::from(side) * u64::from(max_dimension) + u64::from(longest) / 2)
            / u64::from(longest);
        (scaled as u32).max(1)
    };

    if width >= height {
        (max_dimension, scale(height))
    } else {
        (scale(width), max_dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let intensity = ((x + y) % 255) as u8;
            Rgb([intensity, intensity, intensity])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_landscape_dimensions() {
        assert_eq!(calculate_dimensions(1600, 1200, 800), (800, 600));
        assert_eq!(calculate_dimensions(4000, 1000, 800), (800, 200));
    }

    #[test]
    fn test_portrait_dimensions() {
        assert_eq!(calculate_dimensions(1200, 1600, 800), (600, 800));
        assert_eq!(calculate_dimensions(900, 2700, 800), (267, 800));
    }

    #[test]
    fn test_square_dimensions() {
        assert_eq!(calculate_dimensions(1000, 1000, 800), (800, 800));
    }

    #[test]
    fn test_never_upscales() {
        assert_eq!(calculate_dimensions(400, 300, 800), (400, 300));
        assert_eq!(calculate_dimensions(800, 600, 800), (800, 600));
        assert_eq!(calculate_dimensions(1, 1, 800), (1, 1));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(calculate_dimensions(10_000, 2, 800), (800, 1));
    }

    #[test]
    fn test_aspect_ratio_within_rounding() {
        for &(w, h) in &[(1921, 1081), (3000, 1999), (1234, 5678), (801, 799)] {
            let (nw, nh) = calculate_dimensions(w, h, 800);
            assert_eq!(nw.max(nh), 800);
            let original = w as f64 / h as f64;
            let resized = nw as f64 / nh as f64;
            // one pixel of rounding on the short side
            let tolerance = original / nw.min(nh) as f64 + 1e-9;
            assert!((original - resized).abs() <= tolerance, "{}x{} -> {}x{}", w, h, nw, nh);
        }
    }

    #[test]
    fn test_resize_image() {
        let resizer = ImageResizer::new().with_filter(FilterType::Triangle);
        let resized = resizer.resize(create_test_image(1600, 1200));
        assert_eq!((resized.width(), resized.height()), (800, 600));
    }

    #[test]
    fn test_small_image_untouched() {
        let resizer = ImageResizer::new();
        let resized = resizer.resize(create_test_image(400, 300));
        assert_eq!((resized.width(), resized.height()), (400, 300));
    }

    #[test]
    fn test_default_resizer() {
        let resizer = ImageResizer::default();
        assert_eq!(resizer.max_dimension, 800);
        assert_eq!(resizer.filter, FilterType::Lanczos3);
    }
}
