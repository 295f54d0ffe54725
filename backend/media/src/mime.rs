//! MIME type handling for uploaded images.

use std::path::Path;

/// Image formats the grading pipeline accepts.
pub const SUPPORTED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Whether a MIME type is on the supported-image allow-list.
pub fn is_supported_image(mime: &str) -> bool {
    SUPPORTED_IMAGE_TYPES.contains(&mime)
}

/// Detect an image MIME type from a file extension.
///
/// Used by the CLI ingest path; the browser reports file types itself.
/// Detection is wider than the allow-list so a `.bmp` file is reported as
/// an unsupported format rather than as an unknown blob.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
