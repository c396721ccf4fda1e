//! The end-to-end workflow: locate → order → choose output → assemble.
//!
//! Both the command-line and the interactive front-ends build a
//! [`ConversionRequest`] and call [`run`]; decisions that need a human are
//! delegated to a [`Prompter`].

use crate::config::ConversionConfig;
use crate::convert::{ensure_pdf_extension, try_assemble};
use crate::error::ConvertError;
use crate::interactive::Prompter;
use crate::output::AssembledDocument;
use crate::pipeline::codec::Codecs;
use crate::pipeline::format::supported_list;
use crate::pipeline::locate::{locate, ImageSet};
use crate::pipeline::order::apply_order;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when the PDF goes next to the first image.
pub const DEFAULT_OUTPUT_NAME: &str = "converted_images.pdf";

/// Where the page order comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderSource {
    /// Keep the sorted order the locator produced.
    #[default]
    AsListed,
    /// A 1-based permutation supplied up front, e.g. from `--order`.
    Provided(Vec<usize>),
    /// Ask through the [`Prompter`].
    Interactive,
}

/// Where the PDF goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// This path (`.pdf` is appended if missing).
    Path(PathBuf),
    /// `converted_images.pdf` in the directory of the first ordered image.
    #[default]
    AlongsideFirst,
    /// Ask through the [`Prompter`].
    Interactive,
}

/// One conversion job.
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    /// Files and/or directories to search.
    pub inputs: Vec<PathBuf>,
    pub order: OrderSource,
    pub output: OutputTarget,
}

/// `<dir of first_image>/converted_images.pdf`.
pub fn default_output_path(first_image: &Path) -> PathBuf {
    first_image
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUTPUT_NAME)
}

/// Run a whole conversion.
///
/// `prompter` is only consulted for [`OrderSource::Interactive`] and
/// [`OutputTarget::Interactive`]; asking for either without one is an
/// [`ConvertError::InvalidConfig`].
///
/// # Errors
/// * [`ConvertError::NoImagesFound`] when the inputs hold no supported image
/// * [`ConvertError::InvalidOrderingLength`] /
///   [`ConvertError::InvalidOrderingPermutation`] for a bad provided order
/// * anything [`try_assemble`] returns
pub fn run(
    request: &ConversionRequest,
    config: &ConversionConfig,
    codecs: &Codecs,
    mut prompter: Option<&mut dyn Prompter>,
) -> Result<AssembledDocument, ConvertError> {
    // ── Step 1: Locate ───────────────────────────────────────────────────
    let images = locate(&request.inputs);
    if images.is_empty() {
        return Err(ConvertError::NoImagesFound {
            supported: supported_list(),
        });
    }
    info!("Found {} images", images.len());

    // ── Step 2: Order ────────────────────────────────────────────────────
    let ordered: ImageSet = match &request.order {
        OrderSource::AsListed => images,
        OrderSource::Provided(permutation) => apply_order(&images, permutation)?,
        OrderSource::Interactive => require(&mut prompter, "ordering")?.choose_order(&images)?,
    };

    // ── Step 3: Output path ──────────────────────────────────────────────
    let first = ordered
        .first()
        .ok_or_else(|| ConvertError::Internal("ordering produced no images".into()))?;
    let output = match &request.output {
        OutputTarget::Path(p) => ensure_pdf_extension(p),
        OutputTarget::AlongsideFirst => default_output_path(first),
        OutputTarget::Interactive => require(&mut prompter, "output location")?.choose_output(first)?,
    };

    // ── Step 4: Assemble ─────────────────────────────────────────────────
    let doc = try_assemble(ordered.as_slice(), &output, config, codecs)?;
    info!(
        "File size: {:.2} MB ({} pages)",
        doc.size_mib(),
        doc.page_count()
    );
    Ok(doc)
}

fn require<'a, 'p>(
    prompter: &'a mut Option<&'p mut dyn Prompter>,
    what: &str,
) -> Result<&'a mut (dyn Prompter + 'p), ConvertError> {
    match prompter {
        Some(p) => Ok(&mut **p),
        None => Err(ConvertError::InvalidConfig(format!(
            "interactive {what} requested but no prompt is available"
        ))),
    }
}
