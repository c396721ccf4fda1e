//! Result types returned by a conversion.

use crate::error::{ConvertError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One page of the written document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Image the page was built from.
    pub source: PathBuf,
    /// Decoded size before normalisation.
    pub original_width: u32,
    pub original_height: u32,
    /// Raster size embedded in the PDF.
    pub width: u32,
    pub height: u32,
}

impl PageInfo {
    /// Whether the image was shrunk to fit the max dimension.
    pub fn downscaled(&self) -> bool {
        self.width != self.original_width || self.height != self.original_height
    }
}

/// A successfully written PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledDocument {
    /// Final path, with `.pdf` extension.
    pub path: PathBuf,
    /// Size of the file on disk.
    pub byte_size: u64,
    /// Pages in document order.
    pub pages: Vec<PageInfo>,
    /// Wall-clock time spent decoding, normalising and writing.
    pub duration_ms: u64,
}

impl AssembledDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// File size in MiB, as shown to the user.
    pub fn size_mib(&self) -> f64 {
        self.byte_size as f64 / (1024.0 * 1024.0)
    }
}

/// Outcome of one `assemble` call, flattened for reporting.
///
/// Serialises to JSON for `img2pdf --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConversionResult {
    pub fn success(doc: &AssembledDocument) -> Self {
        Self {
            success: true,
            output_path: Some(doc.path.clone()),
            byte_size: Some(doc.byte_size),
            page_count: Some(doc.page_count()),
            error: None,
            message: None,
        }
    }

    pub fn failure(err: &ConvertError) -> Self {
        Self {
            success: false,
            output_path: None,
            byte_size: None,
            page_count: None,
            error: Some(err.kind()),
            message: Some(err.to_string()),
        }
    }
}

impl From<&Result<AssembledDocument, ConvertError>> for ConversionResult {
    fn from(r: &Result<AssembledDocument, ConvertError>) -> Self {
        match r {
            Ok(doc) => Self::success(doc),
            Err(e) => Self::failure(e),
        }
    }
}

impl From<Result<AssembledDocument, ConvertError>> for ConversionResult {
    fn from(r: Result<AssembledDocument, ConvertError>) -> Self {
        Self::from(&r)
    }
}
