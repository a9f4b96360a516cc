//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions that fit `source` inside a `max × max` box, preserving aspect.
///
/// Returns `None` when the source already fits: images are never upscaled.
/// The longer edge becomes exactly `max`; the shorter edge is rounded and
/// never collapses below one pixel.
///
/// ```
/// # use diapositive::imaging::fit_within;
/// assert_eq!(fit_within((4000, 3000), 2500), Some((2500, 1875)));
/// assert_eq!(fit_within((400, 300), 512), None);
/// ```
pub fn fit_within(source: (u32, u32), max: u32) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    if src_w <= max && src_h <= max {
        return None;
    }

    let scaled = |edge: u32, longer: u32| -> u32 {
        ((edge as f64 * max as f64 / longer as f64).round() as u32).max(1)
    };

    if src_w >= src_h {
        // Landscape or square: width is the long edge
        Some((max, scaled(src_h, src_w)))
    } else {
        Some((scaled(src_w, src_h), max))
    }
}
