//! End-to-end integration tests for image2pdf.
//!
//! Every test generates its own images with the `image` crate inside a
//! temporary directory, runs the public API and re-reads the produced PDF
//! with `lopdf` to check page count, order and geometry.
//!
//! Run with:
//!   RUST_LOG=image2pdf=debug cargo test --test e2e -- --nocapture

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use image2pdf::{
    apply_order, assemble, locate, locate_one, run, try_assemble, Codecs, ConversionConfig,
    ConversionProgressCallback, ConversionRequest, ConvertError, ErrorKind, ImageSet,
    OrderSource, OutputTarget, PageCompression, Prompter, TerminalPrompter,
};
use lopdf::{Document, Object};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Route library logs through the test harness; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];
const BLUE: [u8; 3] = [0, 0, 255];

fn solid(dir: &Path, name: &str, w: u32, h: u32, color: [u8; 3]) -> PathBuf {
    let p = dir.join(name);
    RgbImage::from_pixel(w, h, Rgb(color)).save(&p).unwrap();
    p
}

/// `a_green.png`, `b_blue.png`, `c_red.png`: sorted order is G, B, R.
fn three_colours(dir: &Path) -> Vec<PathBuf> {
    vec![
        solid(dir, "c_red.png", 8, 8, RED),
        solid(dir, "a_green.png", 8, 8, GREEN),
        solid(dir, "b_blue.png", 8, 8, BLUE),
    ]
}

struct PageImage {
    width: i64,
    height: i64,
    filter: Option<Vec<u8>>,
    data: Vec<u8>,
}

/// The `/Im0` XObject of every page, in page order.
fn page_images(path: &Path) -> Vec<PageImage> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
            let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();

            let filter = stream
                .dict
                .get(b"Filter")
                .ok()
                .and_then(|f| f.as_name().ok())
                .map(|n| n.to_vec());
            let data = if filter.as_deref() == Some(&b"DCTDecode"[..]) {
                stream.content.clone()
            } else {
                stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone())
            };
            PageImage {
                width: stream.dict.get(b"Width").unwrap().as_i64().unwrap(),
                height: stream.dict.get(b"Height").unwrap().as_i64().unwrap(),
                filter,
                data,
            }
        })
        .collect()
}

fn first_pixels(path: &Path) -> Vec<[u8; 3]> {
    page_images(path)
        .iter()
        .map(|p| [p.data[0], p.data[1], p.data[2]])
        .collect()
}

fn media_boxes(path: &Path) -> Vec<Vec<f32>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"MediaBox")
                .unwrap()
                .as_array()
                .unwrap()
                .iter()
                .map(|o: &Object| o.as_float().unwrap())
                .collect()
        })
        .collect()
}

// ── Locate ───────────────────────────────────────────────────────────────────

#[test]
fn test_locate_mixed_inputs_sorted_and_deduplicated() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let imgs = three_colours(dir.path());
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    solid(&dir.path().join("nested"), "deep.png", 2, 2, RED);

    // Directory plus one of its files again, plus a missing path.
    let set = locate([
        dir.path().to_path_buf(),
        imgs[0].clone(),
        dir.path().join("missing.png"),
    ]);

    let names: Vec<_> = set
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_green.png", "b_blue.png", "c_red.png"]);
    assert!(set.iter().all(|p| p.is_absolute()));
}

#[test]
fn test_locate_empty_directory() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    assert!(locate_one(dir.path()).is_empty());
}

// ── Assemble ─────────────────────────────────────────────────────────────────

#[test]
fn test_pages_follow_input_order() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    three_colours(dir.path());
    let images = locate_one(dir.path());
    let out = dir.path().join("sorted.pdf");

    let result = assemble(images.as_slice(), &out, &ConversionConfig::default(), &Codecs::init());

    assert!(result.success, "{:?}", result.message);
    assert_eq!(result.page_count, Some(3));
    assert_eq!(
        result.byte_size,
        Some(std::fs::metadata(&out).unwrap().len())
    );
    assert_eq!(first_pixels(&out), vec![GREEN, BLUE, RED]);
}

#[test]
fn test_custom_permutation_reorders_pages() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    three_colours(dir.path());
    let images = locate_one(dir.path());
    let reordered = apply_order(&images, &[3, 1, 2]).unwrap();
    let out = dir.path().join("custom.pdf");

    try_assemble(reordered.as_slice(), &out, &ConversionConfig::default(), &Codecs::init())
        .unwrap();

    assert_eq!(first_pixels(&out), vec![RED, GREEN, BLUE]);
}

#[test]
fn test_page_size_is_pixels_at_dpi() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "wide.png", 200, 100, RED);
    let out = dir.path().join("size.pdf");

    let config = ConversionConfig::builder()
        .resolution_dpi(50.0)
        .build()
        .unwrap();
    try_assemble(&[img], &out, &config, &Codecs::init()).unwrap();

    let mb = &media_boxes(&out)[0];
    assert!((mb[2] - 288.0).abs() < 0.01, "width {mb:?}");
    assert!((mb[3] - 144.0).abs() < 0.01, "height {mb:?}");
}

#[test]
fn test_large_image_is_downscaled() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "huge.png", 3000, 1500, BLUE);
    let out = dir.path().join("big.pdf");

    let config = ConversionConfig::builder()
        .max_dimension(500)
        .build()
        .unwrap();
    let doc = try_assemble(&[img], &out, &config, &Codecs::init()).unwrap();

    let pages = page_images(&out);
    assert_eq!((pages[0].width, pages[0].height), (500, 250));
    assert!(doc.pages[0].downscaled());
}

#[test]
fn test_small_image_keeps_resolution() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "small.png", 640, 480, GREEN);
    let out = dir.path().join("small.pdf");

    try_assemble(&[img], &out, &ConversionConfig::default(), &Codecs::init()).unwrap();

    let pages = page_images(&out);
    assert_eq!((pages[0].width, pages[0].height), (640, 480));
}

#[test]
fn test_rgba_image_is_flattened() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("alpha.png");
    RgbaImage::from_pixel(6, 6, Rgba([0, 0, 255, 128]))
        .save(&p)
        .unwrap();
    let out = dir.path().join("alpha.pdf");

    try_assemble(&[p], &out, &ConversionConfig::default(), &Codecs::init()).unwrap();

    let page = &page_images(&out)[0];
    assert_eq!(page.data.len(), 6 * 6 * 3);
}

#[test]
fn test_jpeg_pages() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let imgs = three_colours(dir.path());
    let out = dir.path().join("jpeg.pdf");

    let config = ConversionConfig::builder()
        .compression(PageCompression::Jpeg { quality: 90 })
        .build()
        .unwrap();
    try_assemble(&imgs, &out, &config, &Codecs::init()).unwrap();

    let pages = page_images(&out);
    assert_eq!(pages.len(), 3);
    for page in &pages {
        assert_eq!(page.filter.as_deref(), Some(&b"DCTDecode"[..]));
        assert!(page.data.starts_with(&[0xFF, 0xD8]));
    }
}

#[test]
fn test_output_without_extension_gets_pdf() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "one.png", 4, 4, RED);

    let doc = try_assemble(
        &[img],
        dir.path().join("my album"),
        &ConversionConfig::default(),
        &Codecs::init(),
    )
    .unwrap();

    assert_eq!(doc.path, dir.path().join("my album.pdf"));
    assert!(doc.path.exists());
    assert!(!dir.path().join("my album").exists());
}

#[test]
fn test_missing_parent_directories_are_created() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "one.png", 4, 4, RED);
    let out = dir.path().join("a").join("b").join("c.pdf");

    try_assemble(&[img], &out, &ConversionConfig::default(), &Codecs::init()).unwrap();
    assert_eq!(page_images(&out).len(), 1);
}

#[test]
fn test_nonexistent_image_writes_nothing() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("never.pdf");

    let result = assemble(
        &[dir.path().join("ghost.png")],
        &out,
        &ConversionConfig::default(),
        &Codecs::init(),
    );

    assert!(!result.success);
    assert_eq!(result.error, Some(ErrorKind::NotFound));
    assert!(!out.exists());
}

#[test]
fn test_corrupt_image_is_decode_failure() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let good = solid(dir.path(), "good.png", 4, 4, RED);
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, b"definitely not a png").unwrap();
    let out = dir.path().join("bad.pdf");

    let err = try_assemble(&[good, bad], &out, &ConversionConfig::default(), &Codecs::init())
        .unwrap_err();

    assert!(matches!(err, ConvertError::DecodeFailed { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(!out.exists());
}

#[test]
fn test_empty_input_writes_nothing() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("empty.pdf");
    let none: Vec<PathBuf> = Vec::new();

    let err = try_assemble(&none, &out, &ConversionConfig::default(), &Codecs::init())
        .unwrap_err();

    assert!(matches!(err, ConvertError::NoImagesProvided));
    assert!(!out.exists());
}

#[test]
fn test_result_serialises_to_json() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "one.png", 4, 4, RED);
    let result = assemble(
        &[img],
        dir.path().join("j.pdf"),
        &ConversionConfig::default(),
        &Codecs::init(),
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["page_count"], 1);
    assert!(json.get("error").is_none());
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl ConversionProgressCallback for Recorder {
    fn on_conversion_start(&self, total_images: usize) {
        self.0.lock().unwrap().push(format!("start {total_images}"));
    }
    fn on_image_complete(&self, index: usize, total: usize, _w: u32, _h: u32) {
        self.0.lock().unwrap().push(format!("done {index}/{total}"));
    }
    fn on_image_error(&self, index: usize, total: usize, _error: &str) {
        self.0.lock().unwrap().push(format!("error {index}/{total}"));
    }
    fn on_conversion_complete(&self, total_pages: usize, _byte_size: u64) {
        self.0.lock().unwrap().push(format!("complete {total_pages}"));
    }
    fn on_conversion_failed(&self, _error: &str) {
        self.0.lock().unwrap().push("failed".into());
    }
}

#[test]
fn test_progress_events_in_order() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let imgs = three_colours(dir.path());
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    try_assemble(&imgs, dir.path().join("p.pdf"), &config, &Codecs::init()).unwrap();

    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec!["start 3", "done 1/3", "done 2/3", "done 3/3", "complete 3"]
    );
}

#[test]
fn test_progress_reports_failing_image() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let good = solid(dir.path(), "good.png", 4, 4, RED);
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let _ = try_assemble(
        &[good, dir.path().join("gone.png")],
        dir.path().join("p.pdf"),
        &config,
        &Codecs::init(),
    );

    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec!["start 2", "done 1/2", "error 2/2"]
    );
}

#[test]
fn test_progress_reports_write_failure() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "ok.png", 4, 4, GREEN);
    std::fs::write(dir.path().join("not_a_dir"), "x").unwrap();
    let out = dir.path().join("not_a_dir").join("p.pdf");
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let result = assemble(&[img], &out, &config, &Codecs::init());

    assert!(!result.success);
    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec!["start 1", "done 1/1", "failed"]
    );
}

#[test]
fn test_invalid_literal_config_is_rejected() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let img = solid(dir.path(), "ok.png", 4, 4, GREEN);
    let out = dir.path().join("bad.pdf");
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig {
        resolution_dpi: 0.0,
        progress_callback: Some(recorder.clone() as Arc<dyn ConversionProgressCallback>),
        ..Default::default()
    };

    let err = try_assemble(&[img], &out, &config, &Codecs::init()).unwrap_err();

    assert!(matches!(err, ConvertError::InvalidConfig(_)));
    assert!(recorder.0.lock().unwrap().is_empty());
    assert!(!out.exists());
}

// ── Workflow ─────────────────────────────────────────────────────────────────

#[test]
fn test_workflow_with_scripted_terminal() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    three_colours(dir.path());
    let out = dir.path().join("scripted");

    // menu 2 → bad count → good order → confirm; then custom location.
    let script = format!("2\n1 2\n2 3 1\ny\n2\n{}\n", out.display());
    let mut prompter = TerminalPrompter::new(Cursor::new(script.into_bytes()), Vec::new());

    let request = ConversionRequest {
        inputs: vec![dir.path().to_path_buf()],
        order: OrderSource::Interactive,
        output: OutputTarget::Interactive,
    };
    let doc = run(
        &request,
        &ConversionConfig::default(),
        &Codecs::init(),
        Some(&mut prompter),
    )
    .unwrap();

    assert_eq!(doc.path, dir.path().join("scripted.pdf"));
    assert_eq!(first_pixels(&doc.path), vec![BLUE, RED, GREEN]);

    let transcript = String::from_utf8(prompter.into_inner().1).unwrap();
    assert!(transcript.contains("Error: Please specify exactly 3 numbers."));
}

#[test]
fn test_workflow_non_interactive_defaults() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    three_colours(dir.path());

    let request = ConversionRequest {
        inputs: vec![dir.path().to_path_buf()],
        order: OrderSource::AsListed,
        output: OutputTarget::AlongsideFirst,
    };
    let doc = run(&request, &ConversionConfig::default(), &Codecs::init(), None).unwrap();

    assert_eq!(doc.path.file_name().unwrap(), "converted_images.pdf");
    assert_eq!(first_pixels(&doc.path), vec![GREEN, BLUE, RED]);
}

#[test]
fn test_workflow_no_images() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("readme.md"), "# nothing").unwrap();

    let request = ConversionRequest {
        inputs: vec![dir.path().to_path_buf()],
        ..Default::default()
    };
    let err = run(&request, &ConversionConfig::default(), &Codecs::init(), None).unwrap_err();

    assert!(matches!(err, ConvertError::NoImagesFound { .. }));
    assert!(err.to_string().contains(".png"));
}

/// A prompter that must never be consulted.
struct Unreachable;

impl Prompter for Unreachable {
    fn choose_order(&mut self, _images: &ImageSet) -> Result<ImageSet, ConvertError> {
        panic!("order should not be asked");
    }
    fn choose_output(&mut self, _first: &Path) -> Result<PathBuf, ConvertError> {
        panic!("output should not be asked");
    }
}

#[test]
fn test_workflow_provided_choices_skip_prompts() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    three_colours(dir.path());
    let out = dir.path().join("given.pdf");

    let request = ConversionRequest {
        inputs: vec![dir.path().to_path_buf()],
        order: OrderSource::Provided(vec![3, 2, 1]),
        output: OutputTarget::Path(out.clone()),
    };
    let mut unreachable = Unreachable;
    run(
        &request,
        &ConversionConfig::default(),
        &Codecs::init(),
        Some(&mut unreachable),
    )
    .unwrap();

    assert_eq!(first_pixels(&out), vec![RED, BLUE, GREEN]);
}
