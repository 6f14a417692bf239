//! Source photo discovery.
//!
//! Walks the source root recursively and collects every file that
//! [`naming::is_source_photo`] accepts: names ending in `.jpg` that do not
//! contain `thumbnail`.
//!
//! ```text
//! resources/                       # Source root
//! ├── config.toml                  # Gallery configuration (optional)
//! ├── beach.jpg                    # → source photo
//! ├── beach_thumbnail.jpg          # generated, skipped
//! └── vacation/
//!     ├── img1.jpg                 # → source photo
//!     ├── img1_thumbnail.jpg       # generated, skipped
//!     └── notes.txt                # skipped
//! ```
//!
//! ## Ordering
//!
//! The returned order is the traversal order and becomes the manifest
//! order. Directory entries are visited sorted by file name, so the same
//! tree always yields the same manifest.
//!
//! Returned paths are the root joined with the relative location, so a
//! relative root (`resources`) produces relative paths
//! (`resources/vacation/img1.jpg`) that the front-end can load as-is.

use crate::naming;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Collect source photos under `root` in traversal order.
pub fn scan(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut photos = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if naming::is_source_photo(&entry.file_name().to_string_lossy()) {
            photos.push(entry.into_path());
        }
    }
    Ok(photos)
}
