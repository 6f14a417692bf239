//! One photo's derived attributes, and the caption built from them.
//!
//! A [`PhotoRecord`] is assembled from three inputs: the source path, the
//! raw EXIF record, and the full-resolution dimensions measured before any
//! resize. Assembly validates the metadata, converts the shot parameters,
//! normalizes the device name and keeps only the date of the digitized
//! timestamp. It either produces a fully populated record or an error.
//!
//! ```text
//! Shot with Supercam x on Jun 15 2021 (1/256 sec; f/4.0 50 mm; ISO 400)
//! ```

use crate::config::DeviceCase;
use crate::imaging::Dimensions;
use crate::metadata::{DIGITIZED_AT, MetadataError, RawMetadata};
use crate::naming;
use crate::shot::{self, ShotParameters};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// EXIF date layout: `YYYY:MM:DD`.
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d";
/// Caption date layout: `Jun 15 2021`.
const CAPTION_DATE_FORMAT: &str = "%b %d %Y";

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub source_path: PathBuf,
    pub thumbnail_path: PathBuf,
    /// Full-resolution size, measured before the thumbnail is produced.
    pub dimensions: Dimensions,
    pub sensitivity: u32,
    pub device: String,
    pub shot: ShotParameters,
    /// `"{shutter} sec; f/{aperture} {focal} mm;"`
    pub shot_description: String,
    pub capture_date: NaiveDate,
}

impl PhotoRecord {
    /// Validate `raw` and derive every record field.
    pub fn assemble(
        source: &Path,
        raw: &RawMetadata,
        dimensions: Dimensions,
        device_case: DeviceCase,
    ) -> Result<Self, MetadataError> {
        let capture = raw.require()?;
        let shot = shot::convert(&capture)?;
        Ok(Self {
            source_path: source.to_path_buf(),
            thumbnail_path: naming::thumbnail_path(source),
            dimensions,
            sensitivity: capture.sensitivity,
            device: format_device(&capture.model, device_case),
            shot_description: shot.to_string(),
            shot,
            capture_date: parse_capture_date(&capture.digitized_at)?,
        })
    }

    /// The caption shown under the photo.
    pub fn title(&self) -> String {
        format!(
            "Shot with {} on {} ({} ISO {})",
            self.device,
            self.capture_date.format(CAPTION_DATE_FORMAT),
            self.shot_description,
            self.sensitivity
        )
    }
}

/// Apply the configured casing to a camera model name.
pub fn format_device(model: &str, case: DeviceCase) -> String {
    match case {
        DeviceCase::Capitalize => capitalize(model),
        DeviceCase::UpperFirst => upper_first(model),
        DeviceCase::Preserve => model.to_string(),
    }
}

/// First character uppercased, the rest lowercased: `"SuperCam X"` → `"Supercam x"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// First character uppercased, the rest unchanged: `"iPhone 12"` → `"IPhone 12"`.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Date part of an EXIF timestamp. Everything after the first space is ignored.
pub fn parse_capture_date(timestamp: &str) -> Result<NaiveDate, MetadataError> {
    let date = timestamp
        .split_once(' ')
        .map_or(timestamp, |(date, _)| date);
    NaiveDate::parse_from_str(date, EXIF_DATE_FORMAT).map_err(|e| {
        MetadataError::invalid(DIGITIZED_AT, format!("{:?}: {}", timestamp, e))
    })
}
