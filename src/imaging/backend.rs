//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the gallery
//! needs from an imaging library: identify, read_metadata, and thumbnail.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and
//! statically linked. Tests use the recording `MockBackend` below.

use super::params::ThumbnailParams;
use crate::metadata::{MetadataError, RawMetadata};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get full-resolution image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read the embedded EXIF capture metadata.
    fn read_metadata(&self, path: &Path) -> Result<RawMetadata, BackendError>;

    /// Write a downscaled copy that fits the bounding box in `params`.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
