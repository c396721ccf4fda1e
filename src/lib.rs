//! # image2pdf
//!
//! Collect image files, put them in the order you want, and write them as
//! one multi-page PDF, one page per image.
//!
//! ## Pipeline Overview
//!
//! ```text
//! files / directories
//!  │
//!  ├─ 1. Locate     keep supported extensions, sort, dedupe (non-recursive)
//!  ├─ 2. Order      as listed, a 1-based permutation, or asked interactively
//!  ├─ 3. Output     explicit path, `converted_images.pdf` next to image 1, or asked
//!  ├─ 4. Decode     PNG / JPEG / BMP / TIFF / WebP (+ HEIC/HEIF with `heif`)
//!  ├─ 5. Normalise  RGB8, Lanczos downscale to fit `max_dimension`
//!  └─ 6. Write      lopdf, page size = pixels × 72 / dpi, atomic rename
//! ```
//!
//! Page order in the PDF is always the order the images were given in. Any
//! failing image aborts the run before the output path is touched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use image2pdf::{locate_one, try_assemble, Codecs, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let images = locate_one("scans/");
//!     let config = ConversionConfig::default();
//!     let doc = try_assemble(images.as_slice(), "scans.pdf", &config, &Codecs::init())?;
//!     eprintln!("{} pages, {:.2} MB", doc.page_count(), doc.size_mib());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2pdf` binary (clap + anyhow + indicatif + tracing-subscriber + serde_json) |
//! | `heif`  | off     | HEIC/HEIF decoding through the system libheif |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! image2pdf = { version = "1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod interactive;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageCompression};
pub use convert::{assemble, ensure_pdf_extension, try_assemble};
pub use error::{ConvertError, ErrorKind, OrderingError};
pub use interactive::{Prompter, TerminalPrompter};
pub use output::{AssembledDocument, ConversionResult, PageInfo};
pub use pipeline::codec::Codecs;
pub use pipeline::format::{is_supported, SUPPORTED_EXTENSIONS};
pub use pipeline::locate::{locate, locate_one, ImageSet};
pub use pipeline::normalize::{normalize, NormalizedPage};
pub use pipeline::order::{apply_order, parse_order, validate};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use workflow::{
    default_output_path, run, ConversionRequest, OrderSource, OutputTarget, DEFAULT_OUTPUT_NAME,
};
