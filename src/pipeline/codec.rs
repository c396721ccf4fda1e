//! Image decoding: file on disk → `DynamicImage`.
//!
//! The `image` crate handles JPEG, PNG, WebP, BMP and TIFF. HEIC/HEIF needs
//! the native libheif codec, which is only linked when the `heif` cargo
//! feature is enabled. [`Codecs::init`] is the single place that sets the
//! decoders up; call it once at start-up and pass the value down.

use super::format::is_heif;
use crate::error::ConvertError;
use image::{DynamicImage, ImageError, ImageReader};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// The decoders available to this process.
pub struct Codecs {
    #[cfg(feature = "heif")]
    heif: libheif_rs::LibHeif,
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codecs")
            .field("heif", &self.supports_heif())
            .finish()
    }
}

impl Codecs {
    /// Initialise every decoder. Cheap enough to call once per process.
    pub fn init() -> Self {
        let codecs = Self {
            #[cfg(feature = "heif")]
            heif: libheif_rs::LibHeif::new(),
        };
        info!("Image codecs ready (heif: {})", codecs.supports_heif());
        codecs
    }

    /// Whether `.heic` / `.heif` files can be decoded.
    pub fn supports_heif(&self) -> bool {
        cfg!(feature = "heif")
    }

    /// Decode the image at `path`.
    ///
    /// The format is sniffed from the file contents, falling back to the
    /// extension. I/O failures are classified as
    /// [`ConvertError::ImageNotFound`] / [`ConvertError::PermissionDenied`];
    /// everything else is [`ConvertError::DecodeFailed`].
    pub fn decode(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
        if is_heif(path) {
            return self.decode_heif(path);
        }

        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| ConvertError::from_io(path, e))?;
        let img = reader.decode().map_err(|e| decode_error(path, e))?;
        debug!(
            "Decoded {} → {}x{} {:?}",
            path.display(),
            img.width(),
            img.height(),
            img.color()
        );
        Ok(img)
    }

    #[cfg(feature = "heif")]
    fn decode_heif(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
        use libheif_rs::{ColorSpace, HeifContext, RgbChroma};

        let heif_err = |e: libheif_rs::HeifError| ConvertError::DecodeFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        };

        let bytes = std::fs::read(path).map_err(|e| ConvertError::from_io(path, e))?;
        let ctx = HeifContext::read_from_bytes(&bytes).map_err(heif_err)?;
        let handle = ctx.primary_image_handle().map_err(heif_err)?;
        let decoded = self
            .heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(heif_err)?;

        let planes = decoded.planes();
        let plane = planes.interleaved.ok_or_else(|| ConvertError::DecodeFailed {
            path: path.to_path_buf(),
            detail: "HEIF image has no interleaved RGB plane".into(),
        })?;

        let (width, height) = (plane.width, plane.height);
        let row_len = width as usize * 3;
        let mut buf = Vec::with_capacity(row_len * height as usize);
        for row in plane.data.chunks(plane.stride).take(height as usize) {
            buf.extend_from_slice(&row[..row_len]);
        }

        let rgb = image::RgbImage::from_raw(width, height, buf).ok_or_else(|| {
            ConvertError::DecodeFailed {
                path: path.to_path_buf(),
                detail: "HEIF plane smaller than its reported size".into(),
            }
        })?;
        debug!("Decoded HEIF {} → {}x{}", path.display(), width, height);
        Ok(DynamicImage::ImageRgb8(rgb))
    }

    #[cfg(not(feature = "heif"))]
    fn decode_heif(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
        // Missing files still report as missing, not as a codec problem.
        std::fs::metadata(path).map_err(|e| ConvertError::from_io(path, e))?;
        Err(ConvertError::CodecUnavailable {
            path: path.to_path_buf(),
            codec: "HEIF",
        })
    }
}

fn decode_error(path: &Path, err: ImageError) -> ConvertError {
    match err {
        ImageError::IoError(io) => ConvertError::from_io(path, io),
        other => ConvertError::DecodeFailed {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}
