//! CLI binary for image2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionRequest` + `ConversionConfig`, runs the workflow and prints
//! the result. With no inputs it falls back to the interactive dialogue.

use anyhow::{bail, Context, Result};
use clap::Parser;
use image2pdf::config::DEFAULT_JPEG_QUALITY;
use image2pdf::{
    parse_order, run, AssembledDocument, Codecs, ConversionConfig, ConversionProgressCallback,
    ConversionRequest, ConversionResult, ConvertError, OrderSource, OutputTarget, PageCompression,
    ProgressCallback, TerminalPrompter,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar plus one log line per image.
///
/// The bar stays hidden until `on_conversion_start`, so it never draws over
/// the interactive prompts that run before assembly.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the image currently being decoded.
    image_start: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: ProgressBar::hidden(),
            image_start: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.image_start
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_images: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.set_length(total_images as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_images} images…"))
        ));
    }

    fn on_image_start(&self, _index: usize, _total: usize, path: &Path) {
        if let Ok(mut t) = self.image_start.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_message(display_name(path));
    }

    fn on_image_complete(&self, index: usize, total: usize, width: u32, height: u32) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {:<12}  {}",
            green("✓"),
            index,
            total,
            dim(&format!("{width}x{height}")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_image_error(&self, index: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs();
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.abandon();
    }

    fn on_conversion_complete(&self, _total_pages: usize, _byte_size: u64) {
        self.bar.finish_and_clear();
    }

    fn on_conversion_failed(&self, _error: &str) {
        // The error itself is printed once by `main`.
        self.bar.abandon_with_message(red("writing the PDF failed"));
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive mode: asks for inputs, order and output location
  img2pdf

  # Every image in a directory, prompted for order and location
  img2pdf ~/scans

  # Non-interactive: listed order, PDF next to the first image
  img2pdf -y ~/scans

  # Explicit files, order and output
  img2pdf a.png b.jpg c.heic --order "3 1 2" -o album.pdf

  # Smaller file: JPEG pages, capped at 1600 px
  img2pdf -y --jpeg --max-dimension 1600 ~/photos -o photos

  # Machine-readable result
  img2pdf -y --json ~/scans

SUPPORTED FORMATS:
  .jpg .jpeg .png .webp .bmp .tiff .tif
  .heic .heif   (requires a build with `--features heif`)

ENVIRONMENT VARIABLES:
  IMG2PDF_OUTPUT          Output PDF path
  IMG2PDF_ORDER           Page order, e.g. "3 1 2"
  IMG2PDF_MAX_DIMENSION   Largest page side in pixels (default 2000)
  IMG2PDF_DPI             Page resolution (default 100)
  IMG2PDF_JPEG_QUALITY    JPEG quality 1-100 (enables JPEG pages)
  RUST_LOG                Override the log filter
"#;

/// Convert images to a multi-page PDF with custom ordering.
#[derive(Parser, Debug)]
#[command(
    name = "img2pdf",
    version,
    about = "Convert images to a multi-page PDF with custom ordering",
    long_about = "Collect images from files and directories, arrange them in the order you \
want and write them into a single PDF, one page per image. Run without arguments for an \
interactive session.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image files and/or directories (directories are not searched recursively).
    inputs: Vec<PathBuf>,

    /// Write the PDF here (".pdf" is appended if missing).
    #[arg(short, long, env = "IMG2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Page order as 1-based positions in the listed order, e.g. "3 1 2".
    #[arg(long, env = "IMG2PDF_ORDER")]
    order: Option<String>,

    /// Don't prompt: keep the listed order and save next to the first image
    /// unless --order / --output say otherwise.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Largest allowed width or height of a page, in pixels.
    #[arg(long, env = "IMG2PDF_MAX_DIMENSION", default_value_t = 2000,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_dimension: u32,

    /// Page resolution in DPI (1–2400).
    #[arg(long, env = "IMG2PDF_DPI", default_value_t = 100.0)]
    dpi: f32,

    /// Store pages as JPEG at the default quality instead of lossless.
    #[arg(long)]
    jpeg: bool,

    /// Store pages as JPEG at this quality (1–100).
    #[arg(long, env = "IMG2PDF_JPEG_QUALITY",
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Print the result as JSON on stdout.
    #[arg(long, env = "IMG2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "IMG2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2PDF_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless --verbose asks for them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match execute(&cli, show_progress) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", red("❌"), e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli, show_progress: bool) -> Result<()> {
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(cli, progress_cb)?;

    // Prompts go to stderr when stdout carries JSON.
    let prompt_out: Box<dyn Write> = if cli.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let mut prompter = TerminalPrompter::new(io::stdin().lock(), prompt_out);

    let request = if cli.inputs.is_empty() {
        interactive_request(cli, &mut prompter)?
    } else {
        if !cli.quiet && !cli.json {
            println!("🖼️  Image to PDF Converter");
            println!("{}", "=".repeat(40));
        }
        build_request(cli)?
    };

    let codecs = Codecs::init();
    let result = run(&request, &config, &codecs, Some(&mut prompter));

    if cli.json {
        let json = serde_json::to_string_pretty(&ConversionResult::from(&result))
            .context("Failed to serialise result")?;
        println!("{json}");
    }

    let doc = match result {
        Ok(doc) => doc,
        Err(e @ ConvertError::NoImagesFound { .. }) => bail!("{e}"),
        Err(e) => return Err(e).context("Error creating PDF"),
    };

    if !cli.quiet && !cli.json {
        print_summary(&doc);
    }
    Ok(())
}

/// No inputs on the command line: ask for them, then for an output name.
fn interactive_request<R, W>(
    cli: &Cli,
    prompter: &mut TerminalPrompter<R, W>,
) -> Result<ConversionRequest>
where
    R: io::BufRead,
    W: Write,
{
    if !cli.quiet && !cli.json {
        println!("🖼️  Interactive Image to PDF Converter");
        println!("{}", "=".repeat(40));
    }

    let inputs = prompter.ask_inputs()?;
    if inputs.is_empty() {
        bail!("No input provided!");
    }

    let output = match &cli.output {
        Some(p) => OutputTarget::Path(p.clone()),
        None => match prompter.ask_output_name()? {
            Some(name) => OutputTarget::Path(name),
            None if cli.yes => OutputTarget::AlongsideFirst,
            None => OutputTarget::Interactive,
        },
    };

    Ok(ConversionRequest {
        inputs,
        order: order_source(cli)?,
        output,
    })
}

fn build_request(cli: &Cli) -> Result<ConversionRequest> {
    let output = match &cli.output {
        Some(p) => OutputTarget::Path(p.clone()),
        None if cli.yes => OutputTarget::AlongsideFirst,
        None => OutputTarget::Interactive,
    };
    Ok(ConversionRequest {
        inputs: cli.inputs.clone(),
        order: order_source(cli)?,
        output,
    })
}

fn order_source(cli: &Cli) -> Result<OrderSource> {
    Ok(match &cli.order {
        Some(s) => OrderSource::Provided(
            parse_order(s)
                .map_err(ConvertError::from)
                .context("Invalid --order")?,
        ),
        None if cli.yes => OrderSource::AsListed,
        None => OrderSource::Interactive,
    })
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let compression = match (cli.jpeg_quality, cli.jpeg) {
        (Some(quality), _) => PageCompression::Jpeg { quality },
        (None, true) => PageCompression::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        },
        (None, false) => PageCompression::Lossless,
    };

    let mut builder = ConversionConfig::builder()
        .max_dimension(cli.max_dimension)
        .resolution_dpi(cli.dpi)
        .compression(compression);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(doc: &AssembledDocument) {
    println!(
        "\n{} PDF created successfully: {}",
        green("✅"),
        bold(&doc.path.display().to_string())
    );
    println!("📄 Total pages: {}", doc.page_count());
    println!("📁 File size: {:.2} MB", doc.size_mib());

    let downscaled = doc.pages.iter().filter(|p| p.downscaled()).count();
    if downscaled > 0 {
        println!(
            "{}",
            dim(&format!("   {downscaled} image(s) downscaled to fit the page limit"))
        );
    }
}
