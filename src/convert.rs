//! Document assembly: ordered image paths → one PDF on disk.
//!
//! Images are decoded and normalised strictly one after another, in the
//! order given, and the PDF is written once at the end. The output page
//! order is therefore exactly the input order, and a failure on any image
//! aborts the whole run before anything touches the output path.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{AssembledDocument, ConversionResult, PageInfo};
use crate::pipeline::codec::Codecs;
use crate::pipeline::normalize::{normalize, NormalizedPage};
use crate::pipeline::pdf;
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Append `.pdf` unless the path already ends in it (any case).
///
/// `album` → `album.pdf`, `album.PDF` stays, `scan.v2` → `scan.v2.pdf`.
pub fn ensure_pdf_extension(path: &Path) -> PathBuf {
    let has_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if has_pdf {
        path.to_path_buf()
    } else {
        let mut name: OsString = path.as_os_str().to_owned();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

/// Convert `images` into a PDF at `output_path`, one page per image.
///
/// This is the flattened entry point: failures come back as a
/// [`ConversionResult`] with `success == false` and an
/// [`crate::ErrorKind`]. Use [`try_assemble`] to get the error value.
pub fn assemble<P: AsRef<Path>>(
    images: &[P],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
    codecs: &Codecs,
) -> ConversionResult {
    let result = try_assemble(images, output_path, config, codecs);
    if let Err(ref e) = result {
        warn!("Conversion failed: {}", e);
    }
    ConversionResult::from(result)
}

/// Convert `images` into a PDF at `output_path`, one page per image.
///
/// # Errors
/// * [`ConvertError::InvalidConfig`] when `config` fails
///   [`ConversionConfig::validate`]; nothing is read or written
/// * [`ConvertError::NoImagesProvided`] when `images` is empty; nothing is
///   written
/// * [`ConvertError::ImageNotFound`], [`ConvertError::PermissionDenied`],
///   [`ConvertError::DecodeFailed`], [`ConvertError::CodecUnavailable`]
///   for the first image that cannot be read
/// * [`ConvertError::OutputWriteFailed`] / [`ConvertError::PdfBuildFailed`]
///   when the document cannot be written
pub fn try_assemble<P: AsRef<Path>>(
    images: &[P],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
    codecs: &Codecs,
) -> Result<AssembledDocument, ConvertError> {
    let start = Instant::now();
    config.validate()?;
    if images.is_empty() {
        return Err(ConvertError::NoImagesProvided);
    }

    let output = ensure_pdf_extension(output_path.as_ref());
    let total = images.len();
    info!("Processing {} images → {}", total, output.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    // ── Step 1: decode + normalise, in order ─────────────────────────────
    let mut pages: Vec<NormalizedPage> = Vec::with_capacity(total);
    let mut infos: Vec<PageInfo> = Vec::with_capacity(total);

    for (i, image_path) in images.iter().enumerate() {
        let image_path = image_path.as_ref();
        let index = i + 1;
        debug!("Processing image {}/{}: {}", index, total, image_path.display());
        if let Some(ref cb) = config.progress_callback {
            cb.on_image_start(index, total, image_path);
        }

        let decoded = match codecs.decode(image_path) {
            Ok(img) => img,
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_image_error(index, total, &e.to_string());
                }
                return Err(e);
            }
        };
        let page = normalize(decoded, config.max_dimension);

        if let Some(ref cb) = config.progress_callback {
            cb.on_image_complete(index, total, page.width(), page.height());
        }
        infos.push(PageInfo {
            page_num: index,
            source: image_path.to_path_buf(),
            original_width: page.original_width,
            original_height: page.original_height,
            width: page.width(),
            height: page.height(),
        });
        pages.push(page);
    }

    // ── Step 2: write once ───────────────────────────────────────────────
    let written = write_atomically(&output, |w| {
        pdf::write_pdf(
            &pages,
            config.resolution_dpi,
            config.compression,
            &output,
            w,
        )
    })
    .and_then(|()| {
        fs::metadata(&output)
            .map(|m| m.len())
            .map_err(|e| ConvertError::from_write(&output, e))
    });
    drop(pages);

    let byte_size = match written {
        Ok(size) => size,
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_conversion_failed(&e.to_string());
            }
            return Err(e);
        }
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "PDF created: {} ({} pages, {} bytes, {}ms)",
        output.display(),
        infos.len(),
        byte_size,
        duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(infos.len(), byte_size);
    }

    Ok(AssembledDocument {
        path: output,
        byte_size,
        pages: infos,
        duration_ms,
    })
}

/// Write via `<path>.tmp` + rename so a failed write never leaves a
/// truncated PDF at `path`.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), ConvertError>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<(), ConvertError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConvertError::from_write(parent, e))?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    let result = (|| {
        let file = fs::File::create(&tmp_path).map_err(|e| ConvertError::from_write(path, e))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush().map_err(|e| ConvertError::from_write(path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| ConvertError::from_write(path, e))
    })();

    if result.is_err() && tmp_path.exists() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
