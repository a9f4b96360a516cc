//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader::into_dimensions` |
//! | Decode | `image::ImageReader::decode` |
//! | EXIF read | `exif::Reader::read_from_container` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG | `png::Encoder`, best compression, `eXIf` chunk |

use super::backend::{BackendError, Dimensions, EncodeParams, ImageBackend};
use super::exif_block::build_exif_block;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

const EXIF_CHUNK: png::chunk::ChunkType = png::chunk::ChunkType(*b"eXIf");

/// Pure Rust backend using the `image`, `png` and `kamadak-exif` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

fn decode_error(path: &Path, e: image::ImageError) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn encode_error(e: png::EncodingError) -> BackendError {
    BackendError::Encode(e.to_string())
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        open_reader(path)?
            .decode()
            .map_err(|e| decode_error(path, e))
    }

    fn read_exif(&self, path: &Path) -> Result<Option<exif::Exif>, BackendError> {
        let mut reader = BufReader::new(File::open(path)?);
        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(Some(exif)),
            Err(exif::Error::Io(e)) => Err(BackendError::Io(e)),
            Err(e) => {
                tracing::debug!("no usable EXIF in {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        params: &EncodeParams,
        out: &mut dyn Write,
    ) -> Result<(), BackendError> {
        let (color, pixels) = if image.color().has_alpha() {
            (png::ColorType::Rgba, image.to_rgba8().into_raw())
        } else {
            (png::ColorType::Rgb, image.to_rgb8().into_raw())
        };

        let mut encoder = png::Encoder::new(out, image.width(), image.height());
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Best);

        let mut writer = encoder.write_header().map_err(encode_error)?;
        if let Some(block) = build_exif_block(params)? {
            writer
                .write_chunk(EXIF_CHUNK, &block)
                .map_err(encode_error)?;
        }
        writer.write_image_data(&pixels).map_err(encode_error)?;
        writer.finish().map_err(encode_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exif::{In, Tag, Value};
    use image::{ImageEncoder, RgbImage, RgbaImage};

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    #[test]
    fn probe_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.probe(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn probe_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.probe(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn probe_non_image_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fake.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let result = RustBackend::new().probe(&path);
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn read_exif_absent_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 100, 100);

        let exif = RustBackend::new().read_exif(&path).unwrap();
        assert!(exif.is_none());
    }

    #[test]
    fn resize_exact_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(400, 300));
        let resized = RustBackend::new().resize(&img, 200, 150);
        assert_eq!((resized.width(), resized.height()), (200, 150));
    }

    #[test]
    fn encode_png_with_exif_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 16, |x, y| {
            image::Rgb([x as u8, y as u8, 7])
        }));

        let backend = RustBackend::new();
        let mut file = File::create(&path).unwrap();
        backend
            .encode(
                &img,
                &EncodeParams {
                    copyright: Some("Jo Doe, all rights reserved".into()),
                    description: Some("test frame".into()),
                },
                &mut file,
            )
            .unwrap();
        drop(file);

        let dims = backend.probe(&path).unwrap();
        assert_eq!((dims.width, dims.height), (32, 16));

        let exif = backend.read_exif(&path).unwrap().expect("eXIf chunk");
        let field = exif.get_field(Tag::Copyright, In::PRIMARY).unwrap();
        assert!(
            matches!(&field.value, Value::Ascii(v) if v[0] == b"Jo Doe, all rights reserved")
        );
    }

    #[test]
    fn encode_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        let img = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));

        let backend = RustBackend::new();
        let mut file = File::create(&path).unwrap();
        backend
            .encode(&img, &EncodeParams::default(), &mut file)
            .unwrap();
        drop(file);

        let decoded = backend.decode(&path).unwrap();
        assert!(decoded.color().has_alpha());
        assert!(backend.read_exif(&path).unwrap().is_none());
    }
}
