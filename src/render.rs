//! Page rendering.
//!
//! The site writer hands a typed [`Page`] to a [`Renderer`] and writes
//! whatever string comes back; it never builds HTML itself. [`HtmlTheme`] is
//! the bundled renderer, built with [maud](https://maud.lambda.xyz/) so
//! templates are compile-time checked Rust with automatic escaping.
//!
//! ## URL scheme
//!
//! | Target | URL |
//! |---|---|
//! | album page | `<base>/album/<album-id>` |
//! | photo page | `<base>/album/<album-id>/<n>/` |
//! | image file | `<base>/photo/<photo-id>[.<variant>].png` |
//!
//! `<base>` is the configured `base_url` without its trailing slash.
//!
//! ## Static assets
//!
//! `static/style.css` and `static/nav.js` are embedded at compile time and
//! written to the output's `static/` directory by the site writer.

use crate::album::Album;
use crate::list::Entry;
use crate::metadata::{format_aperture, format_exposure, format_focal_length};
use crate::photo::{Photo, THUMBNAIL_VARIANT, raster_file_name};
use crate::site::Site;
use maud::{DOCTYPE, Markup, html};
use thiserror::Error;

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to render {page} page: {message}")]
    Template { page: &'static str, message: String },
}

/// Everything a template may need to render one page.
#[derive(Clone, Copy)]
pub enum Page<'a> {
    Index,
    Album {
        album: Entry<'a, Album>,
    },
    Photo {
        album: Entry<'a, Album>,
        /// 1-based position in the album.
        index: usize,
        photo: &'a Photo,
    },
    Redirect {
        dest: &'a str,
    },
    NotFound,
}

impl Page<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Album { .. } => "album",
            Page::Photo { .. } => "photo",
            Page::Redirect { .. } => "redirect",
            Page::NotFound => "404",
        }
    }
}

/// Turns page contexts into documents.
pub trait Renderer {
    fn render(&self, site: &Site, page: &Page<'_>) -> Result<String, RenderError>;

    /// Files written under `static/`, as `(file name, contents)`.
    fn static_assets(&self) -> &'static [(&'static str, &'static str)];
}

pub fn album_url(site: &Site, album: &Album) -> String {
    format!("{}/album/{}", site.base_url(), album.id())
}

pub fn photo_url(site: &Site, album: &Album, index: usize) -> String {
    format!("{}/album/{}/{}/", site.base_url(), album.id(), index)
}

pub fn asset_url(site: &Site, photo: &Photo, variant: Option<&str>) -> String {
    format!(
        "{}/photo/{}",
        site.base_url(),
        raster_file_name(photo.id(), variant)
    )
}

fn static_url(site: &Site, file: &str) -> String {
    format!("{}/static/{file}", site.base_url())
}

/// The bundled maud theme.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTheme;

impl Renderer for HtmlTheme {
    fn render(&self, site: &Site, page: &Page<'_>) -> Result<String, RenderError> {
        let markup = match *page {
            Page::Index => render_index(site),
            Page::Album { album } => render_album(site, album),
            Page::Photo {
                album,
                index,
                photo,
            } => render_photo(site, album, index, photo),
            Page::Redirect { dest } => render_redirect(dest),
            Page::NotFound => render_not_found(site),
        };
        Ok(markup.into_string())
    }

    fn static_assets(&self) -> &'static [(&'static str, &'static str)] {
        &[("style.css", CSS), ("nav.js", JS)]
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(site: &Site, title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(static_url(site, "style.css"));
                script src=(static_url(site, "nav.js")) defer {}
            }
            body class=[body_class] {
                header.site-header {
                    a.site-title href={ (site.base_url()) "/" } { (site.title()) }
                }
                (content)
                (site_footer(site))
            }
        }
    }
}

fn site_footer(site: &Site) -> Markup {
    let copyright = site.copyright();
    html! {
        footer.site-footer {
            "© " (copyright.years) " " (copyright.artist) " · " (copyright.licence)
        }
    }
}

fn thumbnail(site: &Site, photo: &Photo, alt: &str) -> Markup {
    html! {
        img src=(asset_url(site, photo, Some(THUMBNAIL_VARIANT))) alt=(alt) loading="lazy";
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Album grid, one card per album with its cover.
fn render_index(site: &Site) -> Markup {
    let content = html! {
        main.index-page {
            div.album-grid {
                @for album in site.albums() {
                    a.album-card href=(album_url(site, album)) {
                        (thumbnail(site, album.cover(), album.title()))
                        span.album-title { (album.title()) }
                        span.album-count { (album.len()) " photos" }
                    }
                }
            }
        }
    };

    base_document(site, site.title(), None, content)
}

/// Thumbnail grid, with links to the neighbouring albums.
fn render_album(site: &Site, album: Entry<'_, Album>) -> Markup {
    let prev = album.prev();
    let next = album.next();

    let content = html! {
        main.album-page {
            header.album-header {
                h1 { (album.title()) }
                nav.album-nav {
                    @if let Some(prev) = prev {
                        a.prev rel="prev" href=(album_url(site, &prev)) { "← " (prev.title()) }
                    }
                    @if let Some(next) = next {
                        a.next rel="next" href=(album_url(site, &next)) { (next.title()) " →" }
                    }
                }
            }
            div.thumbnail-grid {
                @for (idx, photo) in album.photos().iter().enumerate() {
                    a.thumb-link href=(photo_url(site, &album, idx + 1)) {
                        (thumbnail(site, photo, &format!("{} {}", album.title(), idx + 1)))
                    }
                }
            }
        }
    };

    base_document(site, album.title(), None, content)
}

/// Full-size viewer with metadata and prev/next navigation.
fn render_photo(site: &Site, album: Entry<'_, Album>, index: usize, photo: &Photo) -> Markup {
    let meta = photo.metadata();
    let count = album.len();

    let album_link = album_url(site, &album);
    let prev_url = if index > 1 {
        photo_url(site, &album, index - 1)
    } else {
        album_link.clone()
    };
    let next_url = if index < count {
        photo_url(site, &album, index + 1)
    } else {
        album_link.clone()
    };

    let details: Vec<(&str, String)> = [
        ("Camera", meta.camera()),
        ("Lens", meta.lens()),
        ("Focal length", format_focal_length(meta.focal_length)),
        ("Exposure", format_exposure(meta.exposure).map(|e| format!("{e} s"))),
        ("Aperture", format_aperture(meta.aperture).map(|f| format!("f/{f}"))),
        ("ISO", meta.iso.map(|iso| iso.to_string())),
        ("Film", meta.film.clone()),
        (
            "Date",
            meta.date.map(|d| d.format("%Y-%m-%d %H:%M").to_string()),
        ),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();

    let title = format!("{} - {}", album.title(), index);
    let dims = photo.dimensions();
    let aspect_style = format!("--aspect-ratio: {};", dims.width as f64 / dims.height as f64);

    let content = html! {
        main.photo-page {
            nav.breadcrumb {
                a href=(album_link) { (album.title()) }
                " › " (index) " / " (count)
            }
            figure.photo-frame style=(aspect_style) {
                img src=(asset_url(site, photo, None)) alt=(title);
                @if let Some(desc) = &meta.description {
                    figcaption { (desc) }
                }
            }
            @if !details.is_empty() {
                dl.photo-details {
                    @for (label, value) in &details {
                        dt { (label) }
                        dd { (value) }
                    }
                }
            }
        }
        nav.photo-nav {
            a.prev rel="prev" href=(prev_url) { "←" }
            a.up href=(album_link) { "↑" }
            a.next rel="next" href=(next_url) { "→" }
        }
    };

    base_document(site, &title, Some("photo-view"), content)
}

fn render_redirect(dest: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content={ "0; url=" (dest) };
                link rel="canonical" href=(dest);
                title { "Redirecting…" }
            }
            body {
                a href=(dest) { "Continue" }
            }
        }
    }
}

fn render_not_found(site: &Site) -> Markup {
    let content = html! {
        main.not-found {
            h1 { "Not found" }
            p {
                "Nothing here. Back to "
                a href={ (site.base_url()) "/" } { (site.title()) }
                "."
            }
        }
    };

    base_document(site, "Not found", None, content)
}
