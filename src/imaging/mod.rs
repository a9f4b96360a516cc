//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::ImageReader::into_dimensions` |
//! | **EXIF read** | `kamadak-exif` container reader |
//! | **Downscale** | Lanczos3 `resize_exact` |
//! | **Encode → PNG** | `png` encoder with an `eXIf` chunk |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **EXIF block**: building the copyright block embedded into outputs
//! - **Media types**: extension-based image detection for the album scan
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod exif_block;
pub mod media_type;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodeParams, ImageBackend};
pub use calculations::fit_within;
pub use exif_block::build_exif_block;
pub use media_type::{guess_media_type, is_image};
pub use rust_backend::RustBackend;
