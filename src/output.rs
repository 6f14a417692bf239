//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every photo is shown by its positional index and caption, with the
//! filesystem paths as indented context lines. The output reads as a
//! gallery inventory while still tracing each line back to a file.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Photos (2)
//! 001 vacation/img1.jpg
//! 002 vacation/img2.jpg
//! ```
//!
//! ## Build
//!
//! ```text
//! 001/002 Shot with Supercam x on Jun 15 2021 (1/256 sec; f/4.0 50 mm; ISO 400)
//!     Source: resources/vacation/img1.jpg
//!     Thumbnail: resources/vacation/img1_thumbnail.jpg
//! 002/002 skipped
//!     Source: resources/vacation/img2.jpg
//!     Reason: resources/vacation/img2.jpg: missing required EXIF field PhotographicSensitivity
//! ```
//!
//! ## Manifest
//!
//! ```text
//! scripts/photo_list.js (1 photos)
//! scripts/thumbnail_list.js (1 thumbnails)
//! Skipped 1 photo
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::OutputConfig;
use crate::gallery::{BuildResult, GalleryEvent};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `007/120`
fn progress(index: usize, total: usize) -> String {
    format!("{}/{}", format_index(index), format_index(total))
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the discovered source photos, relative to the source root.
pub fn format_scan_output(sources: &[PathBuf], source_root: &Path) -> Vec<String> {
    let mut lines = vec![format!("Photos ({})", sources.len())];
    for (i, source) in sources.iter().enumerate() {
        let rel = source.strip_prefix(source_root).unwrap_or(source);
        lines.push(format!("{} {}", format_index(i + 1), rel.display()));
    }
    lines
}

pub fn print_scan_output(sources: &[PathBuf], source_root: &Path) {
    for line in format_scan_output(sources, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Build progress
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_gallery_event(event: &GalleryEvent) -> Vec<String> {
    match event {
        GalleryEvent::PhotoProcessed {
            index,
            total,
            source,
            thumbnail,
            title,
        } => {
            let mut lines = vec![
                format!("{} {}", progress(*index, *total), title),
                format!("{}Source: {}", indent(1), source),
            ];
            if let Some(thumb) = thumbnail {
                lines.push(format!("{}Thumbnail: {}", indent(1), thumb));
            }
            lines
        }
        GalleryEvent::PhotoSkipped {
            index,
            total,
            source,
            reason,
        } => vec![
            format!("{} skipped", progress(*index, *total)),
            format!("{}Source: {}", indent(1), source),
            format!("{}Reason: {}", indent(1), reason),
        ],
    }
}

// ============================================================================
// Stage 3: Manifest output
// ============================================================================

/// Format the written manifests and the skip count.
pub fn format_manifest_output(result: &BuildResult, output: &OutputConfig) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} ({} photos)",
            output.photo_list.display(),
            result.manifest.photos.len()
        ),
        format!(
            "{} ({} thumbnails)",
            output.thumbnail_list.display(),
            result.manifest.thumbnails.len()
        ),
    ];
    match result.skipped.len() {
        0 => {}
        1 => lines.push("Skipped 1 photo".to_string()),
        n => lines.push(format!("Skipped {} photos", n)),
    }
    lines
}

pub fn print_manifest_output(result: &BuildResult, output: &OutputConfig) {
    for line in format_manifest_output(result, output) {
        println!("{}", line);
    }
}

/// Format the captions of a check run, one per photo in traversal order.
pub fn format_check_output(result: &BuildResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{} {}", format_index(i + 1), record.title()))
        .collect();
    for error in &result.skipped {
        lines.push(format!("Invalid: {}", error));
    }
    lines
}

pub fn print_check_output(result: &BuildResult) {
    for line in format_check_output(result) {
        println!("{}", line);
    }
}
