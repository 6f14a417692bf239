//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **EXIF metadata** | `kamadak-exif` (JPEG APP1 / TIFF IFD) |
//! | **Thumbnail** | Lanczos3 `resize_exact` + `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **EXIF reader**: maps EXIF fields onto [`RawMetadata`](crate::metadata::RawMetadata)
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod exif_reader;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use operations::{ThumbnailConfig, create_thumbnail, extract_metadata, get_dimensions};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
