//! File naming conventions shared by discovery and thumbnail generation.
//!
//! A source photo `img1.jpg` gets its thumbnail written next to it as
//! `img1_thumbnail.jpg`. Front-end viewers reference thumbnails by this
//! name, so the rule must not drift:
//!
//! ```text
//! resources/vacation/img1.jpg  →  resources/vacation/img1_thumbnail.jpg
//! ```
//!
//! Discovery skips any file whose name contains `thumbnail`, which keeps
//! generated thumbnails from being picked up as sources on the next run.

use std::path::{Path, PathBuf};

/// Extension a source photo must end with. Matched exactly (case-sensitive).
pub const SOURCE_EXTENSION: &str = ".jpg";

/// Marker excluding a file from discovery, and the suffix added to thumbnails.
pub const THUMBNAIL_MARKER: &str = "thumbnail";

/// Whether a file name denotes a source photo.
///
/// ```text
/// img1.jpg            → true
/// img1_thumbnail.jpg  → false
/// img1.JPG            → false  (exact extension match)
/// notes.txt           → false
/// ```
pub fn is_source_photo(file_name: &str) -> bool {
    file_name.ends_with(SOURCE_EXTENSION) && !file_name.contains(THUMBNAIL_MARKER)
}

/// Thumbnail location for a source photo: same directory, `<stem>_thumbnail.jpg`.
///
/// The stem is the file name with its trailing `.jpg` removed. A name
/// without that suffix is used whole, so the result never equals the input.
pub fn thumbnail_path(source: &Path) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(SOURCE_EXTENSION)
        .unwrap_or(&*file_name);
    source.with_file_name(format!("{stem}_{THUMBNAIL_MARKER}{SOURCE_EXTENSION}"))
}
