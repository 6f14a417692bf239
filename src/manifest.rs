//! The two manifest artifacts consumed by the front-end viewer.
//!
//! Each artifact is a script holding one assignment of a JSON value:
//!
//! ```text
//! scripts/photo_list.js      photos = [{"src":"resources/a.jpg","w":4000,"h":3000,"title":"Shot with ..."}]
//! scripts/thumbnail_list.js  thumbnails = ["resources/a_thumbnail.jpg"]
//! ```
//!
//! `thumbnails[i]` is always the thumbnail of `photos[i]`. Both scripts are
//! rendered, then staged next to their targets as `*.tmp` files, and only
//! then renamed into place. A failure at any step leaves neither manifest
//! behind.

use crate::record::PhotoRecord;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One full-size entry of the `photos` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoEntry {
    pub src: String,
    pub w: u32,
    pub h: u32,
    pub title: String,
}

impl From<&PhotoRecord> for PhotoEntry {
    fn from(record: &PhotoRecord) -> Self {
        Self {
            src: record.source_path.to_string_lossy().into_owned(),
            w: record.dimensions.width,
            h: record.dimensions.height,
            title: record.title(),
        }
    }
}

/// Index-aligned `photos` and `thumbnails` sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalleryManifest {
    pub photos: Vec<PhotoEntry>,
    pub thumbnails: Vec<String>,
}

impl GalleryManifest {
    /// Build both sequences from records already in traversal order.
    pub fn from_records(records: &[PhotoRecord]) -> Self {
        Self {
            photos: records.iter().map(PhotoEntry::from).collect(),
            thumbnails: records
                .iter()
                .map(|r| r.thumbnail_path.to_string_lossy().into_owned())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// `photos = <json>`
    pub fn photo_list_script(&self) -> Result<String, ManifestError> {
        Ok(format!("photos = {}", serde_json::to_string(&self.photos)?))
    }

    /// `thumbnails = <json>`
    pub fn thumbnail_list_script(&self) -> Result<String, ManifestError> {
        Ok(format!(
            "thumbnails = {}",
            serde_json::to_string(&self.thumbnails)?
        ))
    }

    /// Render both scripts, then write them, creating parent directories.
    pub fn write(&self, photo_list: &Path, thumbnail_list: &Path) -> Result<(), ManifestError> {
        let photos = self.photo_list_script()?;
        let thumbnails = self.thumbnail_list_script()?;

        let staged_photos = stage(photo_list, &photos)?;
        let staged_thumbnails = match stage(thumbnail_list, &thumbnails) {
            Ok(path) => path,
            Err(e) => {
                let _ = fs::remove_file(&staged_photos);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&staged_photos, photo_list) {
            let _ = fs::remove_file(&staged_photos);
            let _ = fs::remove_file(&staged_thumbnails);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&staged_thumbnails, thumbnail_list) {
            let _ = fs::remove_file(photo_list);
            let _ = fs::remove_file(&staged_thumbnails);
            return Err(e.into());
        }
        Ok(())
    }
}

/// `scripts/photo_list.js` → `scripts/photo_list.js.tmp`
fn staged_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write `contents` beside `path` and return the staged file's path.
fn stage(path: &Path, contents: &str) -> Result<PathBuf, ManifestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staged = staged_path(path);
    if let Err(e) = fs::write(&staged, contents) {
        let _ = fs::remove_file(&staged);
        return Err(e.into());
    }
    Ok(staged)
}
