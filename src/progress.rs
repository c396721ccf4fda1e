//! Progress-callback trait for per-image conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the assembler works through the image list.
//!
//! # Example
//!
//! ```rust
//! use image2pdf::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize, width: u32, height: u32) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Image {}/{} → {}x{}", index, total, width, height);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the assembler as it processes each image.
///
/// Images are processed strictly in order, one at a time, so `index` values
/// arrive ascending. The trait is still `Send + Sync` so a callback can be
/// shared with other threads of the host application.
/// All methods have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first image is decoded.
    fn on_conversion_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called before an image is decoded.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position (and page number)
    /// * `total` — number of images in this conversion
    /// * `path`  — the source file
    fn on_image_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called once an image is decoded and normalised.
    ///
    /// `width` and `height` are the final page raster size in pixels.
    fn on_image_complete(&self, index: usize, total: usize, width: u32, height: u32) {
        let _ = (index, total, width, height);
    }

    /// Called when an image fails. The conversion stops after this event.
    fn on_image_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after the PDF was written.
    ///
    /// # Arguments
    /// * `total_pages` — pages in the written document
    /// * `byte_size`   — size of the written file
    fn on_conversion_complete(&self, total_pages: usize, byte_size: u64) {
        let _ = (total_pages, byte_size);
    }

    /// Called when writing the document fails after every image decoded.
    /// No further events follow.
    fn on_conversion_failed(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
