//! Which file extensions the converter accepts.

use std::path::Path;

/// Extensions accepted as input, lowercase, without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "webp", "heic", "heif", "bmp", "tiff", "tif",
];

/// Whether `extension` names a supported image format.
///
/// Case-insensitive; a single leading dot is ignored.
pub fn is_supported(extension: &str) -> bool {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(ext))
}

/// Whether the extension of `path` is supported. Paths without one are not.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_supported)
}

/// HEIC/HEIF need a dedicated codec.
pub fn is_heif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("heic") || e.eq_ignore_ascii_case("heif"))
}

/// Sorted, dotted list for user-facing messages: `.bmp, .heic, …`.
pub fn supported_list() -> String {
    let mut exts: Vec<&str> = SUPPORTED_EXTENSIONS.to_vec();
    exts.sort_unstable();
    exts.iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}
