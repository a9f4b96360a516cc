//! Site entity and the build pipeline.
//!
//! A build has exactly two phases:
//!
//! 1. **Read**: [`Site::load_config`] then [`Site::read_albums`]. Every
//!    top-level directory of the photo directory becomes an [`Album`], in
//!    sorted order, except hidden directories and the reserved `_site`.
//! 2. **Write**: [`Site::write`] wipes and recreates the output directory,
//!    then writes static assets, the index, redirect and 404 pages, and every
//!    album with its photo pages and rasters.
//!
//! ## Output Structure
//!
//! ```text
//! _site/
//! ├── index.html
//! ├── 404.html
//! ├── static/
//! │   ├── style.css
//! │   └── nav.js
//! ├── album/
//! │   ├── index.html             # redirect to /
//! │   └── <album-id>/
//! │       ├── index.html
//! │       └── <n>/index.html     # one per photo, 1-based
//! └── photo/
//!     ├── index.html             # redirect to /
//!     ├── <photo-id>.png
//!     └── <photo-id>.thm.png
//! ```
//!
//! ## Parallel Processing
//!
//! Photo loading and raster generation run on the global rayon pool. Pages
//! are written sequentially, and album and photo order is always the sorted
//! directory order.
//!
//! ## Diagnostics
//!
//! Progress and recoverable problems are reported as [`BuildEvent`]s on an
//! optional channel; the CLI formats and logs them (see [`crate::output`]).

use crate::album::{Album, AlbumError, is_hidden};
use crate::config::{self, ConfigError, Copyright, ProcessingConfig, SiteConfig};
use crate::imaging::ImageBackend;
use crate::list::NodeList;
use crate::photo::{Photo, PhotoError, RasterStatus, THUMBNAIL_VARIANT};
use crate::render::{Page, RenderError, Renderer};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Directory name never treated as an album (the default output location).
pub const RESERVED_DIR: &str = "_site";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Album(#[from] AlbumError),
    #[error(transparent)]
    Photo(#[from] PhotoError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Progress and diagnostics emitted during a build.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    AlbumLoaded {
        album: String,
        photos: usize,
    },
    /// `album.toml` named a cover outside `1..=photos`; photo 1 is used.
    CoverOutOfRange {
        album: String,
        cover: i64,
        photos: usize,
    },
    AlbumWritten {
        album: String,
        title: String,
        photos: usize,
    },
    PhotoWritten {
        album: String,
        index: usize,
        photo: String,
        thumbnail: RasterStatus,
        full: RasterStatus,
    },
    SiteWritten {
        albums: usize,
        photos: usize,
    },
}

pub(crate) fn emit(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

#[derive(Debug)]
pub struct Site {
    base_url: String,
    title: String,
    thumb_size: u32,
    image_size: u32,
    copyright: Copyright,
    processing: ProcessingConfig,
    albums: NodeList<Album>,
}

impl Site {
    /// Load `diapositive.toml`. Fails before anything is written.
    pub fn load_config(path: &Path) -> Result<Self, SiteError> {
        let config = config::load_config(path)?;
        Ok(Self::from_config(config)?)
    }

    pub fn from_config(config: SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let copyright = config.copyright.ok_or(ConfigError::MissingCopyright)?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            title: config.title,
            thumb_size: config.thumb_size,
            image_size: config.image_size,
            copyright,
            processing: config.processing,
            albums: NodeList::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn thumb_size(&self) -> u32 {
        self.thumb_size
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn copyright(&self) -> &Copyright {
        &self.copyright
    }

    pub fn processing(&self) -> &ProcessingConfig {
        &self.processing
    }

    pub fn albums(&self) -> &NodeList<Album> {
        &self.albums
    }

    pub fn photo_count(&self) -> usize {
        self.albums.iter().map(Album::len).sum()
    }

    /// Load every album below `input_root`, replacing any previous list.
    pub fn read_albums(
        &mut self,
        backend: &impl ImageBackend,
        input_root: &Path,
        events: Option<&Sender<BuildEvent>>,
    ) -> Result<(), SiteError> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(input_root)? {
            let path = entry?.path();
            if path.is_dir() && !is_hidden(&path) && !path.ends_with(RESERVED_DIR) {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut albums = NodeList::new();
        for dir in dirs {
            let album = Album::load(backend, &dir, events)?;
            emit(
                events,
                BuildEvent::AlbumLoaded {
                    album: album.id().to_string(),
                    photos: album.len(),
                },
            );
            albums.append(album);
        }
        self.albums = albums;
        Ok(())
    }

    /// Build the whole site into `output_root`, which is deleted first.
    pub fn write(
        &self,
        backend: &impl ImageBackend,
        renderer: &impl Renderer,
        output_root: &Path,
        events: Option<&Sender<BuildEvent>>,
    ) -> Result<(), SiteError> {
        if output_root.exists() {
            tracing::debug!("removing {}", output_root.display());
            fs::remove_dir_all(output_root)?;
        }
        fs::create_dir_all(output_root)?;

        let static_dir = output_root.join("static");
        fs::create_dir_all(&static_dir)?;
        for (name, contents) in renderer.static_assets() {
            fs::write(static_dir.join(name), contents)?;
        }

        self.write_page(renderer, &Page::Index, &output_root.join("index.html"))?;
        for section in ["album", "photo"] {
            let dir = output_root.join(section);
            fs::create_dir_all(&dir)?;
            self.write_page(
                renderer,
                &Page::Redirect { dest: "/" },
                &dir.join("index.html"),
            )?;
        }
        self.write_page(renderer, &Page::NotFound, &output_root.join("404.html"))?;

        for entry in self.albums.entries() {
            Album::write(renderer, self, entry, output_root)?;
            emit(
                events,
                BuildEvent::AlbumWritten {
                    album: entry.id().to_string(),
                    title: entry.title().to_string(),
                    photos: entry.len(),
                },
            );

            for (i, photo) in entry.photos().iter().enumerate() {
                photo.write_page(renderer, self, entry, i + 1, output_root)?;
            }

            let statuses = entry
                .photos()
                .par_iter()
                .map(|photo| {
                    let written = self.write_rasters(backend, photo, output_root);
                    photo.release_raster();
                    written
                })
                .collect::<Result<Vec<_>, _>>()?;

            for (i, (photo, (thumbnail, full))) in
                entry.photos().iter().zip(statuses).enumerate()
            {
                emit(
                    events,
                    BuildEvent::PhotoWritten {
                        album: entry.id().to_string(),
                        index: i + 1,
                        photo: photo.id().to_string(),
                        thumbnail,
                        full,
                    },
                );
            }
        }

        emit(
            events,
            BuildEvent::SiteWritten {
                albums: self.albums.len(),
                photos: self.photo_count(),
            },
        );
        Ok(())
    }

    fn write_rasters(
        &self,
        backend: &impl ImageBackend,
        photo: &Photo,
        output_root: &Path,
    ) -> Result<(RasterStatus, RasterStatus), PhotoError> {
        let copyright = Some(&self.copyright);
        let thumbnail = photo.write_raster(
            backend,
            self.thumb_size,
            output_root,
            Some(THUMBNAIL_VARIANT),
            copyright,
        )?;
        let full = photo.write_raster(backend, self.image_size, output_root, None, copyright)?;
        Ok((thumbnail, full))
    }

    fn write_page(
        &self,
        renderer: &impl Renderer,
        page: &Page<'_>,
        path: &Path,
    ) -> Result<(), SiteError> {
        let html = renderer.render(self, page)?;
        fs::write(path, html)?;
        Ok(())
    }
}
