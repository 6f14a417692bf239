//! Gallery building: source photos in, ordered manifest out.
//!
//! For every discovered source photo the builder runs the same straight
//! line, in this order:
//!
//! 1. **Identify**: full-resolution dimensions, before any resize.
//! 2. **Extract**: the raw EXIF record.
//! 3. **Assemble**: validate, convert, and caption ([`PhotoRecord`]).
//! 4. **Thumbnail**: shrink into the bounding box next to the source.
//!
//! ## Parallel Processing
//!
//! Photos are independent, so they are processed in parallel using
//! [rayon](https://docs.rs/rayon). Indexed collection puts every record back
//! at its traversal position, which keeps `photos[i]` and `thumbnails[i]`
//! aligned no matter which worker finishes first.
//!
//! ## Failure Policy
//!
//! With [`ErrorPolicy::Abort`] (the default) the first failing photo fails
//! the whole build and [`generate`] writes no manifest: a correct gallery or
//! none at all. [`ErrorPolicy::Skip`] reports each failing photo as a
//! [`GalleryEvent::PhotoSkipped`] and leaves it out of both manifests.

use crate::config::{DeviceCase, ErrorPolicy, GalleryConfig, OutputConfig};
use crate::imaging::{
    BackendError, ImageBackend, Quality, RustBackend, ThumbnailConfig, create_thumbnail,
    extract_metadata, get_dimensions,
};
use crate::manifest::{GalleryManifest, ManifestError};
use crate::metadata::MetadataError;
use crate::record::PhotoRecord;
use crate::scan::ScanError;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("{}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("{}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
}

impl GalleryError {
    /// True when a required capture field (or the whole EXIF block) was absent.
    pub fn is_missing_metadata(&self) -> bool {
        matches!(self, Self::Metadata { source, .. } if source.is_missing())
    }

    /// Source photo the error belongs to, if it is a per-photo failure.
    pub fn photo_path(&self) -> Option<&Path> {
        match self {
            Self::Photo { path, .. } | Self::Metadata { path, .. } => Some(path),
            _ => None,
        }
    }

    fn photo(path: &Path, error: BackendError) -> Self {
        match error {
            BackendError::Metadata(source) => Self::Metadata {
                path: path.to_path_buf(),
                source,
            },
            source => Self::Photo {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Everything one build needs besides the photo list.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub thumbnail: ThumbnailConfig,
    pub device_case: DeviceCase,
    pub on_error: ErrorPolicy,
    /// When false, photos are validated and captioned but no thumbnail is written.
    pub write_thumbnails: bool,
}

impl BuildOptions {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            thumbnail: ThumbnailConfig {
                bound: (config.thumbnails.max_width, config.thumbnails.max_height),
                quality: Quality::new(config.thumbnails.quality),
            },
            device_case: config.captions.device_case,
            on_error: config.processing.on_error,
            write_thumbnails: true,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

/// Progress events, sent as each photo completes. `index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    PhotoProcessed {
        index: usize,
        total: usize,
        source: String,
        thumbnail: Option<String>,
        title: String,
    },
    PhotoSkipped {
        index: usize,
        total: usize,
        source: String,
        reason: String,
    },
}

#[derive(Debug)]
pub struct BuildResult {
    pub manifest: GalleryManifest,
    /// Records in traversal order, aligned with the manifest.
    pub records: Vec<PhotoRecord>,
    /// Per-photo failures left out in skip mode, in traversal order.
    pub skipped: Vec<GalleryError>,
}

/// Run the per-photo pipeline for one source.
///
/// Dimensions are read before the thumbnail exists, so they always describe
/// the full-resolution original.
pub fn process_photo(
    backend: &impl ImageBackend,
    source: &Path,
    options: &BuildOptions,
) -> Result<PhotoRecord, GalleryError> {
    let dimensions =
        get_dimensions(backend, source).map_err(|e| GalleryError::photo(source, e))?;
    let raw = extract_metadata(backend, source).map_err(|e| GalleryError::photo(source, e))?;
    let record = PhotoRecord::assemble(source, &raw, dimensions, options.device_case).map_err(
        |e| GalleryError::Metadata {
            path: source.to_path_buf(),
            source: e,
        },
    )?;

    if options.write_thumbnails {
        create_thumbnail(backend, source, &record.thumbnail_path, &options.thumbnail)
            .map_err(|e| GalleryError::photo(source, e))?;
    }

    Ok(record)
}

pub fn build(
    sources: &[PathBuf],
    options: &BuildOptions,
    events: Option<Sender<GalleryEvent>>,
) -> Result<BuildResult, GalleryError> {
    let backend = RustBackend::new();
    build_with_backend(&backend, sources, options, events)
}

/// Build the manifest using a specific backend (allows testing with mock).
pub fn build_with_backend(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    options: &BuildOptions,
    events: Option<Sender<GalleryEvent>>,
) -> Result<BuildResult, GalleryError> {
    let total = sources.len();
    let emit = |event: GalleryEvent| {
        if let Some(tx) = &events {
            // A closed receiver only means nobody is listening
            tx.send(event).ok();
        }
    };

    let run = |index: usize, source: &PathBuf| {
        let outcome = process_photo(backend, source, options);
        match &outcome {
            Ok(record) => emit(GalleryEvent::PhotoProcessed {
                index: index + 1,
                total,
                source: record.source_path.display().to_string(),
                thumbnail: options
                    .write_thumbnails
                    .then(|| record.thumbnail_path.display().to_string()),
                title: record.title(),
            }),
            Err(e) if options.on_error == ErrorPolicy::Skip => emit(GalleryEvent::PhotoSkipped {
                index: index + 1,
                total,
                source: source.display().to_string(),
                reason: e.to_string(),
            }),
            Err(_) => {}
        }
        outcome
    };

    let (records, skipped) = match options.on_error {
        ErrorPolicy::Abort => {
            let records = sources
                .par_iter()
                .enumerate()
                .map(|(i, source)| run(i, source))
                .collect::<Result<Vec<_>, _>>()?;
            (records, Vec::new())
        }
        ErrorPolicy::Skip => {
            let outcomes: Vec<_> = sources
                .par_iter()
                .enumerate()
                .map(|(i, source)| run(i, source))
                .collect();
            let mut records = Vec::with_capacity(outcomes.len());
            let mut skipped = Vec::new();
            for outcome in outcomes {
                match outcome {
                    Ok(record) => records.push(record),
                    Err(e) => skipped.push(e),
                }
            }
            (records, skipped)
        }
    };

    Ok(BuildResult {
        manifest: GalleryManifest::from_records(&records),
        records,
        skipped,
    })
}

/// Build the gallery and write both manifest scripts.
///
/// Nothing is written unless the build succeeds.
pub fn generate(
    sources: &[PathBuf],
    options: &BuildOptions,
    output: &OutputConfig,
    events: Option<Sender<GalleryEvent>>,
) -> Result<BuildResult, GalleryError> {
    let backend = RustBackend::new();
    generate_with_backend(&backend, sources, options, output, events)
}

pub fn generate_with_backend(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    options: &BuildOptions,
    output: &OutputConfig,
    events: Option<Sender<GalleryEvent>>,
) -> Result<BuildResult, GalleryError> {
    let result = build_with_backend(backend, sources, options, events)?;
    result
        .manifest
        .write(&output.photo_list, &output.thumbnail_list)?;
    Ok(result)
}
