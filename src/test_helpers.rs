//! Shared test utilities for the diapositive test suite.
//!
//! Provides synthetic image writers (optionally carrying EXIF) and builders
//! for a photo directory laid out the way the CLI expects it.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_site_config(tmp.path(), "");
//! create_album(tmp.path(), "Lisbon", 3);
//! ```

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::{ImageEncoder, RgbImage};
use std::io::Cursor;
use std::path::Path;

pub use tempfile::TempDir;

// =========================================================================
// Images
// =========================================================================

/// Encode a small JPEG whose pixels depend on `seed`.
pub fn jpeg_bytes(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, seed])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

pub fn write_jpeg(path: &Path, width: u32, height: u32, seed: u8) {
    std::fs::write(path, jpeg_bytes(width, height, seed)).unwrap();
}

/// Write a JPEG with an APP1 EXIF segment holding the given ASCII tags.
pub fn write_jpeg_with_exif(path: &Path, width: u32, height: u32, seed: u8, tags: &[(Tag, &str)]) {
    let fields: Vec<Field> = tags
        .iter()
        .map(|(tag, text)| Field {
            tag: *tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![text.as_bytes().to_vec()]),
        })
        .collect();
    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let jpeg = jpeg_bytes(width, height, seed);
    let segment_len = (2 + 6 + tiff.len()) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]); // SOI
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

// =========================================================================
// Photo directory fixtures
// =========================================================================

/// Write `diapositive.toml` with a copyright section plus `extra` lines.
pub fn write_site_config(root: &Path, extra: &str) {
    let config = format!(
        "base_url = \"https://photos.example.org/\"\n{extra}\n\n[copyright]\nartist = \"Jo Doe\"\nyears = \"2024\"\n"
    );
    std::fs::write(root.join("diapositive.toml"), config).unwrap();
}

/// Create an album directory holding `count` distinct JPEGs
/// (`01.jpg`, `02.jpg`, ...).
pub fn create_album(root: &Path, name: &str, count: usize) -> std::path::PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for i in 1..=count {
        write_jpeg(&dir.join(format!("{i:02}.jpg")), 48, 32, (i * 37 % 256) as u8);
    }
    dir
}

/// Sorted file names (relative, `/`-separated) below `root`.
pub fn list_files(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
