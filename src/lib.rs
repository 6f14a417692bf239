//! # EXIF Gallery
//!
//! Turns a directory of full-resolution photographs into a web-ready
//! gallery: a bounded thumbnail next to every photo, and two script
//! manifests a front-end viewer includes directly.
//!
//! # Architecture: Per-Photo Pipeline
//!
//! ```text
//! resources/  →  scan   →  [img1.jpg, vacation/img2.jpg, ...]   (traversal order)
//!             →  build  →  identify → EXIF → caption → thumbnail (per photo, parallel)
//!             →  write  →  scripts/photo_list.js + scripts/thumbnail_list.js
//! ```
//!
//! Each photo's caption is derived from its EXIF block. Exposure and
//! aperture are stored in APEX (logarithmic) units and are decoded back to
//! conventional notation:
//!
//! ```text
//! Shot with Supercam x on Jun 15 2021 (1/256 sec; f/4.0 50 mm; ISO 400)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source root and lists source photos |
//! | [`naming`] | Source-photo filter and `_thumbnail.jpg` path derivation |
//! | [`metadata`] | Typed raw EXIF record, validation, error taxonomy |
//! | [`shot`] | APEX decoding and shutter/aperture/focal-length display |
//! | [`record`] | One photo's derived attributes and caption |
//! | [`gallery`] | Parallel per-photo pipeline, failure policy, top-level `generate` |
//! | [`manifest`] | `photos = [...]` / `thumbnails = [...]` rendering and writing |
//! | [`imaging`] | Pure-Rust image operations: identify, EXIF reading, thumbnail |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## All or Nothing by Default
//!
//! A photo with a missing or malformed EXIF field fails the run and no
//! manifest is written, so the viewer never sees a half-captioned gallery.
//! `on_error = "skip"` (or `build --keep-going`) opts into leaving bad photos
//! out instead.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decoding, Lanczos3
//! resampling and JPEG encoding, and `kamadak-exif` for metadata. The binary
//! has no system dependencies.

pub mod config;
pub mod gallery;
pub mod imaging;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod record;
pub mod scan;
pub mod shot;

#[cfg(test)]
pub(crate) mod test_helpers;
