//! Extension-based media type detection.
//!
//! Album scanning keeps files whose media type is `image/*`. Detection is by
//! extension only; whether the file actually decodes is decided later by
//! [`ImageBackend::probe`](super::ImageBackend::probe).

use std::path::Path;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("ico", "image/vnd.microsoft.icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("webp", "image/webp"),
];

pub fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

pub fn is_image(path: &Path) -> bool {
    guess_media_type(path).is_some_and(|m| m.starts_with("image/"))
}
