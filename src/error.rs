//! Error types for the image2pdf library.
//!
//! Two error types reflect two distinct layers:
//!
//! * [`ConvertError`] — **Fatal** for the current conversion: nothing was
//!   found, an image could not be read, the PDF could not be written.
//!   Returned from [`crate::convert::try_assemble`] and
//!   [`crate::workflow::run`].
//!
//! * [`OrderingError`] — a rejected ordering. The interactive prompt recovers
//!   from it locally by asking again; non-interactive callers get it back as
//!   the matching [`ConvertError`] variant.
//!
//! Every [`ConvertError`] maps onto a coarse [`ErrorKind`] so that a
//! [`crate::output::ConversionResult`] can report *why* a run failed without
//! carrying the full error value around.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the image2pdf library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The locator found nothing to convert.
    #[error("No supported images found!\nSupported formats: {supported}")]
    NoImagesFound { supported: String },

    /// The assembler was handed an empty list.
    #[error("No images to convert")]
    NoImagesProvided,

    /// An image file disappeared or never existed.
    #[error("Image file not found: '{path}'")]
    ImageNotFound { path: PathBuf },

    /// The process may not read an input or write the output.
    #[error("Permission denied: '{path}'")]
    PermissionDenied { path: PathBuf },

    // ── Ordering errors ───────────────────────────────────────────────────
    /// Ordering has the wrong number of entries.
    #[error("Please specify exactly {expected} numbers (got {actual})")]
    InvalidOrderingLength { expected: usize, actual: usize },

    /// Ordering repeats a value or uses one outside 1..=n.
    #[error("Please use each number from 1 to {n} exactly once")]
    InvalidOrderingPermutation { n: usize },

    // ── Codec errors ──────────────────────────────────────────────────────
    /// The image codec could not decode the file.
    #[error("Failed to decode '{path}': {detail}")]
    DecodeFailed { path: PathBuf, detail: String },

    /// The file needs a codec this build does not include.
    #[error("No {codec} codec available for '{path}'\nRebuild with `--features heif` to enable it.")]
    CodecUnavailable { path: PathBuf, codec: &'static str },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create, write or rename the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// lopdf refused to serialise the document.
    #[error("Failed to build PDF '{path}': {detail}")]
    PdfBuildFailed { path: PathBuf, detail: String },

    // ── Config / interaction ──────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Standard input closed while a question was pending.
    #[error("Input ended before a choice was made")]
    PromptAborted,

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Coarse classification used in [`crate::output::ConversionResult`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::ImageNotFound { .. } => ErrorKind::NotFound,
            ConvertError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            ConvertError::OutputWriteFailed { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::NotFound,
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                _ => ErrorKind::Other,
            },
            _ => ErrorKind::Other,
        }
    }

    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => ConvertError::ImageNotFound { path },
            std::io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied { path },
            _ => ConvertError::DecodeFailed {
                path,
                detail: err.to_string(),
            },
        }
    }

    /// Classify an I/O error raised while writing `path`.
    pub(crate) fn from_write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            ConvertError::PermissionDenied { path }
        } else {
            ConvertError::OutputWriteFailed { path, source: err }
        }
    }
}

/// Failure classification reported by a [`crate::output::ConversionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Other,
}

/// Why an ordering was rejected.
///
/// The variants are kept apart so a front-end can say *what* was wrong
/// instead of printing a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// A token was not a non-negative integer.
    #[error("'{token}' is not a number")]
    Malformed { token: String },

    /// Wrong number of entries.
    #[error("expected {expected} numbers, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Right length, but a value repeats or falls outside 1..=n.
    #[error("each number from 1 to {n} must appear exactly once")]
    NotAPermutation { n: usize },
}

impl From<OrderingError> for ConvertError {
    fn from(e: OrderingError) -> Self {
        match e {
            OrderingError::LengthMismatch { expected, actual } => {
                ConvertError::InvalidOrderingLength { expected, actual }
            }
            OrderingError::NotAPermutation { n } => ConvertError::InvalidOrderingPermutation { n },
            OrderingError::Malformed { token } => ConvertError::InvalidConfig(format!(
                "ordering must be space-separated numbers, found '{token}'"
            )),
        }
    }
}
