//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the five operations a photo needs:
//! probe, decode, read_exif, resize, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! recording [`MockBackend`](tests::MockBackend) so album and site logic can
//! be exercised without decoding real files.

use image::DynamicImage;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("EXIF block could not be written: {0}")]
    Exif(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Text embedded into an output image's EXIF block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeParams {
    pub copyright: Option<String>,
    pub description: Option<String>,
}

/// Trait for image processing backends.
///
/// Must be `Sync`: photos are loaded and rasterized on the rayon pool.
pub trait ImageBackend: Sync {
    /// Read the image header. Fails when the file is not a decodable image.
    fn probe(&self, path: &Path) -> Result<Dimensions, BackendError>;

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Read the EXIF block. A file without one yields `Ok(None)`.
    fn read_exif(&self, path: &Path) -> Result<Option<exif::Exif>, BackendError>;

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage;

    /// Encode as PNG into `out`, embedding `params` as EXIF.
    fn encode(
        &self,
        image: &DynamicImage,
        params: &EncodeParams,
        out: &mut dyn Write,
    ) -> Result<(), BackendError>;
}
