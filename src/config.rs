//! Configuration types for image-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. [`ConversionConfigBuilder::build`]
//! rejects out-of-range values, so an assembled config is always usable.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on the larger side of every page, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 2000;

/// Default logical resolution the pages are laid out at.
pub const DEFAULT_RESOLUTION_DPI: f32 = 100.0;

/// Default JPEG quality when [`PageCompression::Jpeg`] is chosen without one.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Configuration for an image-to-PDF conversion.
///
/// # Example
/// ```rust
/// use image2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .max_dimension(1600)
///     .resolution_dpi(150.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_dimension, 1600);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Largest allowed width or height of a page, in pixels. Default: 2000.
    ///
    /// Bigger images are downscaled with Lanczos3 so the larger side equals
    /// this value; smaller images keep their resolution.
    pub max_dimension: u32,

    /// Logical DPI the pixels are laid out at. Default: 100.
    ///
    /// A page is `pixels × 72 / dpi` points wide, so a 2000 px image at
    /// 100 DPI becomes a 1440 pt (20 in) page.
    pub resolution_dpi: f32,

    /// How page rasters are stored inside the PDF. Default: lossless.
    pub compression: PageCompression,

    /// Optional per-image progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            resolution_dpi: DEFAULT_RESOLUTION_DPI,
            compression: PageCompression::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("max_dimension", &self.max_dimension)
            .field("resolution_dpi", &self.resolution_dpi)
            .field("compression", &self.compression)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check every field against its allowed range.
    ///
    /// Called by [`ConversionConfigBuilder::build`] and again by
    /// [`crate::try_assemble`] before any image is read.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.max_dimension == 0 {
            return Err(ConvertError::InvalidConfig(
                "max dimension must be ≥ 1 pixel".into(),
            ));
        }
        if !self.resolution_dpi.is_finite() || !(1.0..=2400.0).contains(&self.resolution_dpi) {
            return Err(ConvertError::InvalidConfig(format!(
                "resolution must be 1–2400 DPI, got {}",
                self.resolution_dpi
            )));
        }
        if let PageCompression::Jpeg { quality } = self.compression {
            if !(1..=100).contains(&quality) {
                return Err(ConvertError::InvalidConfig(format!(
                    "JPEG quality must be 1–100, got {quality}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn max_dimension(mut self, px: u32) -> Self {
        self.config.max_dimension = px;
        self
    }

    pub fn resolution_dpi(mut self, dpi: f32) -> Self {
        self.config.resolution_dpi = dpi;
        self
    }

    pub fn compression(mut self, compression: PageCompression) -> Self {
        self.config.compression = compression;
        self
    }

    /// Shorthand for `compression(PageCompression::Jpeg { quality })`.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.compression = PageCompression::Jpeg { quality };
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How each page raster is stored in the PDF.
///
/// | Variant | Filter | Trade-off |
/// |---------|--------|-----------|
/// | `Lossless` | `FlateDecode` | exact pixels, larger files (default) |
/// | `Jpeg` | `DCTDecode` | much smaller for photos, lossy |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageCompression {
    /// Raw RGB, Flate-compressed.
    #[default]
    Lossless,
    /// Re-encoded as baseline JPEG at the given quality (1–100).
    Jpeg { quality: u8 },
}
