//! Album entity: one directory of photos.
//!
//! The album id is the slug of its directory name; the display title and
//! cover photo can be overridden in `album.toml` (see [`crate::config`]).
//! Photos are the directory's image files in sorted file-name order. Hidden
//! files, subdirectories and non-image files are ignored.

use crate::config::{self, AlbumConfig, ConfigError};
use crate::imaging::{ImageBackend, is_image};
use crate::list::Entry;
use crate::photo::{Photo, PhotoError};
use crate::render::{Page, RenderError, Renderer};
use crate::site::{BuildEvent, Site, emit};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Album config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to load {}: {source}", path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: PhotoError,
    },
    #[error("album '{0}' contains no photos")]
    Empty(String),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug)]
pub struct Album {
    id: String,
    title: String,
    source: PathBuf,
    /// 0-based index into `photos`, always in range.
    cover: usize,
    photos: Vec<Photo>,
}

impl Album {
    /// Load the album at `path`: config, photo list, photos, cover.
    pub fn load(
        backend: &impl ImageBackend,
        path: &Path,
        events: Option<&Sender<BuildEvent>>,
    ) -> Result<Self, AlbumError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = slugify(&name);
        let AlbumConfig { title, cover } = config::load_album_config(path)?.unwrap_or_default();

        let files = list_images(path)?;
        let photos = files
            .par_iter()
            .map(|file| {
                Photo::load(backend, file).map_err(|source| AlbumError::Photo {
                    path: file.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if photos.is_empty() {
            return Err(AlbumError::Empty(id));
        }

        let requested = cover.unwrap_or(1);
        let cover = match usize::try_from(requested) {
            Ok(n) if (1..=photos.len()).contains(&n) => n - 1,
            _ => {
                emit(
                    events,
                    BuildEvent::CoverOutOfRange {
                        album: id.clone(),
                        cover: requested,
                        photos: photos.len(),
                    },
                );
                0
            }
        };

        Ok(Self {
            title: title.unwrap_or_else(|| id.clone()),
            id,
            source: path.to_path_buf(),
            cover,
            photos,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn cover(&self) -> &Photo {
        &self.photos[self.cover]
    }

    /// 1-based position of the cover photo.
    pub fn cover_index(&self) -> usize {
        self.cover + 1
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Always false: an album without photos fails to load.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Write `album/<id>/index.html` for the album at `entry`.
    pub fn write(
        renderer: &impl Renderer,
        site: &Site,
        entry: Entry<'_, Album>,
        output_root: &Path,
    ) -> Result<PathBuf, AlbumError> {
        let dir = output_root.join("album").join(entry.id());
        fs::create_dir_all(&dir)?;
        let html = renderer.render(site, &Page::Album { album: entry })?;
        let path = dir.join("index.html");
        fs::write(&path, html)?;
        Ok(path)
    }
}

/// Replace each run of non-ASCII-alphanumeric characters with `-`, then
/// lower-case.
///
/// ```
/// # use diapositive::album::slugify;
/// assert_eq!(slugify("My Trip 2024!"), "my-trip-2024-");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            slug.push('-');
            in_run = true;
        }
    }
    slug
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Image files directly inside `dir`, sorted by name.
fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && !is_hidden(&path) && is_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
