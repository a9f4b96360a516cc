//! CLI output formatting for build events.
//!
//! # Information-First Display
//!
//! Output leads with what was built (album titles, positional photo indices)
//! and shows output paths as secondary context. Every album follows the same
//! two-level pattern: a header line, then indented lines per photo.
//!
//! # Output Format
//!
//! ```text
//! Loaded album lisbon (3 photos)
//! Lisbon, May (3 photos) → album/lisbon/index.html
//!     001 3f2a9c0d → album/lisbon/1/index.html
//!         thumbnail: written
//!         full: exists
//! Generated 1 album, 3 photo pages
//! ```
//!
//! # Architecture
//!
//! [`format_event`] is pure (returns `Vec<String>`) for testability.
//! [`log_event`] forwards the formatted lines to `tracing` at a level chosen
//! per event, so `--verbose` and `--debug` control how much is shown.

use crate::photo::RasterStatus;
use crate::site::BuildEvent;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// First 8 characters of a photo id, enough to tell photos apart in a log.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn status_label(status: RasterStatus) -> &'static str {
    match status {
        RasterStatus::Written => "written",
        RasterStatus::Skipped => "exists",
    }
}

pub fn format_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::AlbumLoaded { album, photos } => {
            vec![format!("Loaded album {album} ({})", plural(*photos, "photo"))]
        }
        BuildEvent::CoverOutOfRange {
            album,
            cover,
            photos,
        } => vec![format!(
            "cover index {cover} for album '{album}' outside range (photos in album: {photos})"
        )],
        BuildEvent::AlbumWritten {
            album,
            title,
            photos,
        } => vec![format!(
            "{title} ({}) \u{2192} album/{album}/index.html",
            plural(*photos, "photo")
        )],
        BuildEvent::PhotoWritten {
            album,
            index,
            photo,
            thumbnail,
            full,
        } => vec![
            format!(
                "{}{} {} \u{2192} album/{album}/{index}/index.html",
                indent(1),
                format_index(*index),
                short_id(photo)
            ),
            format!("{}thumbnail: {}", indent(2), status_label(*thumbnail)),
            format!("{}full: {}", indent(2), status_label(*full)),
        ],
        BuildEvent::SiteWritten { albums, photos } => vec![format!(
            "Generated {}, {}",
            plural(*albums, "album"),
            plural(*photos, "photo page")
        )],
    }
}

/// Emit an event through `tracing`.
///
/// Cover fallbacks are warnings; album progress is info; per-photo detail is
/// debug.
pub fn log_event(event: &BuildEvent) {
    for line in format_event(event) {
        match event {
            BuildEvent::CoverOutOfRange { .. } => tracing::warn!("{line}"),
            BuildEvent::PhotoWritten { .. } => tracing::debug!("{line}"),
            BuildEvent::AlbumLoaded { .. }
            | BuildEvent::AlbumWritten { .. }
            | BuildEvent::SiteWritten { .. } => tracing::info!("{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "photo"), "1 photo");
        assert_eq!(plural(0, "photo"), "0 photos");
        assert_eq!(plural(3, "album"), "3 albums");
    }

    #[test]
    fn short_id_handles_short_input() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    // =========================================================================
    // Event formatting
    // =========================================================================

    #[test]
    fn album_loaded() {
        let lines = format_event(&BuildEvent::AlbumLoaded {
            album: "lisbon".into(),
            photos: 1,
        });
        assert_eq!(lines, vec!["Loaded album lisbon (1 photo)"]);
    }

    #[test]
    fn cover_out_of_range() {
        let lines = format_event(&BuildEvent::CoverOutOfRange {
            album: "dunes".into(),
            cover: 99,
            photos: 2,
        });
        assert_eq!(
            lines,
            vec!["cover index 99 for album 'dunes' outside range (photos in album: 2)"]
        );
    }

    #[test]
    fn album_written() {
        let lines = format_event(&BuildEvent::AlbumWritten {
            album: "lisbon".into(),
            title: "Lisbon, May".into(),
            photos: 3,
        });
        assert_eq!(
            lines,
            vec!["Lisbon, May (3 photos) \u{2192} album/lisbon/index.html"]
        );
    }

    #[test]
    fn photo_written() {
        let lines = format_event(&BuildEvent::PhotoWritten {
            album: "lisbon".into(),
            index: 2,
            photo: "3f2a9c0d11223344".into(),
            thumbnail: RasterStatus::Written,
            full: RasterStatus::Skipped,
        });
        assert_eq!(
            lines,
            vec![
                "    002 3f2a9c0d \u{2192} album/lisbon/2/index.html",
                "        thumbnail: written",
                "        full: exists",
            ]
        );
    }

    #[test]
    fn site_written() {
        let lines = format_event(&BuildEvent::SiteWritten {
            albums: 1,
            photos: 3,
        });
        assert_eq!(lines, vec!["Generated 1 album, 3 photo pages"]);
    }
}
