//! # diapositive
//!
//! A simple static photo gallery generator. A directory of albums goes in; a
//! self-contained static website comes out: HTML pages, resized images and
//! thumbnails, no server-side component.
//!
//! # Architecture: Read, Then Write
//!
//! ```text
//! 1. Read    diapositive.toml + PHOTODIR/  →  Site { albums: NodeList<Album> }
//! 2. Write   Site                          →  _site/ (pages, rasters, assets)
//! ```
//!
//! Reading probes every image and normalizes its EXIF but decodes no pixels.
//! Writing decodes each photo once, emits a thumbnail and a full-size PNG,
//! and releases the pixels before moving on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Site entity, album discovery, the full write pass, build events |
//! | [`album`] | Album entity: slug id, `album.toml`, ordered photos, cover |
//! | [`photo`] | Photo entity: content-addressed id, metadata, raster variants |
//! | [`metadata`] | EXIF → normalized [`metadata::Metadata`]; exposure/aperture formatting |
//! | [`list`] | Arena-backed doubly-linked list holding albums in order |
//! | [`render`] | [`render::Renderer`] seam, typed page contexts, URL scheme, maud theme |
//! | [`imaging`] | [`imaging::ImageBackend`] seam: probe, decode, EXIF, resize, PNG encode |
//! | [`config`] | `diapositive.toml` and `album.toml` loading and validation |
//! | [`output`] | CLI formatting and logging of [`site::BuildEvent`]s |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Stable Photo URLs
//!
//! A photo's id is derived from its EXIF block, not its path or pixels.
//! Renaming a file or re-exporting it with a different crop keeps its URL;
//! see [`photo`] for the exact scheme.
//!
//! ## Never Overwrite a Raster
//!
//! Generated PNGs are created with create-new semantics and skipped when
//! present. Within one build, two writers can never clobber each other's
//! output.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Templates are type-checked Rust, interpolation is
//! auto-escaped, and there is no template directory to ship. Pages are
//! rendered behind the [`render::Renderer`] trait, so the site writer can be
//! tested without HTML.
//!
//! ## Injected Diagnostics
//!
//! Core code does not print. It sends [`site::BuildEvent`]s on an optional
//! channel and the CLI decides how to show them.

pub mod album;
pub mod config;
pub mod imaging;
pub mod list;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod photo;
pub mod render;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
