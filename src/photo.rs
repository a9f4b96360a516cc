//! Photo entity: identity, metadata, and the files generated from one image.
//!
//! ## Identity
//!
//! A photo's id is the first 16 bytes of a SHA-256 digest, hex encoded. The
//! digest input is the photo's EXIF block rendered canonically (one
//! `ifd:tag=value` line per field, sorted), so re-exporting the same shot
//! with different pixels keeps its URL stable. Files without EXIF are
//! digested by content instead.
//!
//! ## Outputs
//!
//! ```text
//! photo/<id>.png          # full size, longest edge ≤ image_size
//! photo/<id>.thm.png      # thumbnail, longest edge ≤ thumb_size
//! album/<album>/<n>/index.html
//! ```
//!
//! Raster outputs are never overwritten: an existing file is reported as
//! [`RasterStatus::Skipped`] without decoding the source.

use crate::album::Album;
use crate::config::Copyright;
use crate::imaging::{BackendError, Dimensions, EncodeParams, ImageBackend, fit_within};
use crate::list::Entry;
use crate::metadata::Metadata;
use crate::render::{Page, RenderError, Renderer};
use crate::site::Site;
use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Variant name of the thumbnail raster.
pub const THUMBNAIL_VARIANT: &str = "thm";

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterStatus {
    Written,
    /// The output already existed.
    Skipped,
}

#[derive(Debug)]
pub struct Photo {
    id: String,
    source: PathBuf,
    dimensions: Dimensions,
    metadata: Metadata,
    raster: Mutex<Option<Arc<DynamicImage>>>,
}

impl Photo {
    /// Probe, identify and read metadata for the image at `path`.
    ///
    /// Pixels are not decoded until the first raster write.
    pub fn load(backend: &impl ImageBackend, path: &Path) -> Result<Self, PhotoError> {
        let dimensions = backend.probe(path)?;
        let (id, metadata) = match backend.read_exif(path)? {
            Some(exif) => (
                digest_id(canonical_exif(&exif).as_bytes()),
                Metadata::from_tags(&exif),
            ),
            None => (digest_id(&fs::read(path)?), Metadata::default()),
        };
        tracing::debug!("loaded photo {id} from {}", path.display());

        Ok(Self {
            id,
            source: path.to_path_buf(),
            dimensions,
            metadata,
            raster: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// `photo/<id>.png`, or `photo/<id>.<variant>.png`.
    pub fn raster_path(&self, output_root: &Path, variant: Option<&str>) -> PathBuf {
        output_root.join("photo").join(raster_file_name(&self.id, variant))
    }

    /// Write a downscaled PNG of this photo with the copyright embedded.
    pub fn write_raster(
        &self,
        backend: &impl ImageBackend,
        max_dimension: u32,
        output_root: &Path,
        variant: Option<&str>,
        copyright: Option<&Copyright>,
    ) -> Result<RasterStatus, PhotoError> {
        let path = self.raster_path(output_root, variant);
        if path.exists() {
            tracing::debug!("{} exists, skipping", path.display());
            return Ok(RasterStatus::Skipped);
        }

        let image = self.raster(backend)?;
        let resized;
        let output = match fit_within((image.width(), image.height()), max_dimension) {
            Some((width, height)) => {
                resized = backend.resize(&image, width, height);
                &resized
            }
            None => image.as_ref(),
        };

        let params = EncodeParams {
            copyright: copyright.map(Copyright::notice),
            description: self.metadata.description.clone(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // create_new: whoever loses a race for the same output leaves it alone.
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(RasterStatus::Skipped),
            Err(e) => return Err(e.into()),
        };

        let mut writer = BufWriter::new(file);
        let written = backend
            .encode(output, &params, &mut writer)
            .map_err(PhotoError::from)
            .and_then(|()| writer.flush().map_err(PhotoError::from));
        if let Err(e) = written {
            // A truncated file would be skipped forever on the next run.
            drop(writer);
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        tracing::debug!("wrote {}", path.display());
        Ok(RasterStatus::Written)
    }

    /// Write the photo page for position `index` (1-based) of `album`.
    pub fn write_page(
        &self,
        renderer: &impl Renderer,
        site: &Site,
        album: Entry<'_, Album>,
        index: usize,
        output_root: &Path,
    ) -> Result<PathBuf, PhotoError> {
        let dir = output_root
            .join("album")
            .join(album.id())
            .join(index.to_string());
        fs::create_dir_all(&dir)?;

        let html = renderer.render(
            site,
            &Page::Photo {
                album,
                index,
                photo: self,
            },
        )?;
        let path = dir.join("index.html");
        fs::write(&path, html)?;
        Ok(path)
    }

    /// Drop the decoded pixels. The next raster write decodes again.
    pub fn release_raster(&self) {
        *self.raster.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn raster(&self, backend: &impl ImageBackend) -> Result<Arc<DynamicImage>, PhotoError> {
        let mut cached = self.raster.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(image) = cached.as_ref() {
            return Ok(Arc::clone(image));
        }
        let image = Arc::new(backend.decode(&self.source)?);
        *cached = Some(Arc::clone(&image));
        Ok(image)
    }
}

pub fn raster_file_name(id: &str, variant: Option<&str>) -> String {
    match variant {
        Some(variant) => format!("{id}.{variant}.png"),
        None => format!("{id}.png"),
    }
}

/// Render an EXIF block as sorted `ifd:tag=value` lines.
pub fn canonical_exif(exif: &exif::Exif) -> String {
    let mut fields: Vec<&exif::Field> = exif.fields().collect();
    fields.sort_by_cached_key(|f| (f.ifd_num.index(), f.tag.number(), f.tag.to_string()));
    fields
        .iter()
        .map(|f| format!("{}:{}={}\n", f.ifd_num.index(), f.tag, f.display_value()))
        .collect()
}

fn digest_id(bytes: &[u8]) -> String {
    let hex = format!("{:x}", Sha256::digest(bytes));
    hex[..32].to_string()
}
