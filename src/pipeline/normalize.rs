//! Page normalisation: RGB conversion plus a bounded downscale.
//!
//! PDF pages are written as 8-bit `DeviceRGB` rasters, so every decoded
//! image is brought to RGB8 first. Alpha is simply dropped, which shows
//! transparent areas against whatever colour the pixels carry; there is no
//! compositing onto a chosen background.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use tracing::debug;

/// A decoded image ready to become one PDF page.
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    /// RGB8 pixels, larger side ≤ the max dimension used to build it.
    pub image: RgbImage,
    pub original_width: u32,
    pub original_height: u32,
}

impl NormalizedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Convert `image` to RGB8 and cap its larger side at `max_dimension`.
///
/// Images already within bounds keep their resolution. Larger ones are
/// resized with Lanczos3, preserving aspect ratio, so that the larger side
/// equals `max_dimension`.
pub fn normalize(image: DynamicImage, max_dimension: u32) -> NormalizedPage {
    let (original_width, original_height) = (image.width(), image.height());

    let image = if original_width.max(original_height) > max_dimension {
        let resized = image.resize(max_dimension, max_dimension, FilterType::Lanczos3);
        debug!(
            "Downscaled {}x{} → {}x{}",
            original_width,
            original_height,
            resized.width(),
            resized.height()
        );
        resized
    } else {
        image
    };

    let rgb = match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    };

    NormalizedPage {
        image: rgb,
        original_width,
        original_height,
    }
}
