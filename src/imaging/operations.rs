//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, ThumbnailParams};
use crate::metadata::RawMetadata;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get full-resolution dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// Extract the raw EXIF capture metadata using the backend.
pub fn extract_metadata(backend: &impl ImageBackend, path: &Path) -> Result<RawMetadata> {
    backend.read_metadata(path)
}

/// Configuration for thumbnail generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailConfig {
    /// Bounding box as (width, height).
    pub bound: (u32, u32),
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            bound: (600, 800),
            quality: Quality::default(),
        }
    }
}

/// Plan a thumbnail operation without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_thumbnail(source: &Path, output: &Path, config: &ThumbnailConfig) -> ThumbnailParams {
    let (max_width, max_height) = config.bound;
    ThumbnailParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        max_width,
        max_height,
        quality: config.quality,
    }
}

/// Create a thumbnail image at `output`.
///
/// Shrinks to fit the configured bounding box, preserving aspect ratio.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &ThumbnailConfig,
) -> Result<()> {
    backend.thumbnail(&plan_thumbnail(source, output, config))
}
