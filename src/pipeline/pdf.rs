//! PDF serialisation: normalised pages → multi-page PDF via lopdf.
//!
//! ## Layout
//!
//! Every page is exactly the size of its raster at the configured DPI
//! (`points = pixels × 72 / dpi`) and carries one image XObject drawn over
//! the whole MediaBox:
//!
//! ```text
//! Catalog ─▶ Pages ─▶ [Page 1, Page 2, …]      (Kids in input order)
//!                      Page ─▶ Contents  "q w 0 0 h 0 0 cm /Im0 Do Q"
//!                           └▶ Resources /XObject /Im0 ─▶ Image (DeviceRGB, 8 bpc)
//! ```

use super::normalize::NormalizedPage;
use crate::config::PageCompression;
use crate::error::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Name the page image is registered under in each page's resources.
const IMAGE_NAME: &str = "Im0";

/// PostScript points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Build the document for `pages` and serialise it into `out`.
///
/// `path` is only used for error messages.
pub fn write_pdf<W: Write>(
    pages: &[NormalizedPage],
    resolution_dpi: f32,
    compression: PageCompression,
    path: &Path,
    out: &mut W,
) -> Result<(), ConvertError> {
    let mut doc = build_document(pages, resolution_dpi, compression, path)?;
    doc.save_to(out).map_err(|e| ConvertError::PdfBuildFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(())
}

/// Assemble an in-memory document, one page per entry of `pages`.
pub fn build_document(
    pages: &[NormalizedPage],
    resolution_dpi: f32,
    compression: PageCompression,
    path: &Path,
) -> Result<Document, ConvertError> {
    let build_err = |detail: String| ConvertError::PdfBuildFailed {
        path: path.to_path_buf(),
        detail,
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let image_stream =
            image_xobject(page, compression).map_err(|e| build_err(e.to_string()))?;
        let image_id = doc.add_object(image_stream);

        let width_pt = page.width() as f32 * POINTS_PER_INCH / resolution_dpi;
        let height_pt = page.height() as f32 * POINTS_PER_INCH / resolution_dpi;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width_pt.into(),
                        0f32.into(),
                        0f32.into(),
                        height_pt.into(),
                        0f32.into(),
                        0f32.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|e| build_err(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0f32.into(), 0f32.into(), width_pt.into(), height_pt.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal(concat!("image2pdf ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    // Flate-compresses content streams and lossless rasters; JPEG streams
    // opt out below.
    doc.compress();
    debug!("Built PDF with {} pages", count);
    Ok(doc)
}

/// The image XObject stream for one page.
fn image_xobject(
    page: &NormalizedPage,
    compression: PageCompression,
) -> Result<Stream, image::ImageError> {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => page.width() as i64,
        "Height" => page.height() as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
    };

    match compression {
        PageCompression::Lossless => Ok(Stream::new(dict, page.image.as_raw().clone())),
        PageCompression::Jpeg { quality } => {
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&page.image)?;
            dict.set("Filter", "DCTDecode");
            Ok(Stream::new(dict, buf).with_compression(false))
        }
    }
}
