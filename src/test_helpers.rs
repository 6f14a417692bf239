//! Shared test utilities for the exif-gallery test suite.
//!
//! Provides a canonical capture-metadata record, the matching EXIF fields,
//! and writers for synthetic JPEG files (with or without an EXIF block).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("img1.jpg");
//! write_jpeg_with_exif(&path, 64, 48, &sample_exif_fields());
//! ```

use crate::metadata::{RawMetadata, Rational};
use exif::{Field, In, Tag, Value};
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Metadata fixtures
// =========================================================================

/// A complete record: ISO 400, "SuperCam X", Tv 8 (1/256 s), Av 4 (f/4),
/// 50 mm, digitized 2021-06-15.
pub fn sample_raw_metadata() -> RawMetadata {
    RawMetadata {
        sensitivity: Some(400),
        model: Some("SuperCam X".to_string()),
        shutter_speed: Some(Rational::new(8, 1)),
        aperture: Some(Rational::new(4, 1)),
        focal_length: Some(Rational::new(50, 1)),
        digitized_at: Some("2021:06:15 14:30:00".to_string()),
        mistyped: Vec::new(),
    }
}

/// EXIF fields that map onto [`sample_raw_metadata`].
pub fn sample_exif_fields() -> Vec<Field> {
    vec![
        primary(Tag::Model, Value::Ascii(vec![b"SuperCam X".to_vec()])),
        primary(Tag::PhotographicSensitivity, Value::Short(vec![400])),
        primary(
            Tag::ShutterSpeedValue,
            Value::SRational(vec![exif::SRational { num: 8, denom: 1 }]),
        ),
        primary(
            Tag::ApertureValue,
            Value::Rational(vec![exif::Rational { num: 4, denom: 1 }]),
        ),
        primary(
            Tag::FocalLength,
            Value::Rational(vec![exif::Rational { num: 50, denom: 1 }]),
        ),
        primary(
            Tag::DateTimeDigitized,
            Value::Ascii(vec![b"2021:06:15 14:30:00".to_vec()]),
        ),
    ]
}

/// Build a primary-IFD field.
pub fn primary(tag: Tag, value: Value) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    }
}

// =========================================================================
// Synthetic JPEG files
// =========================================================================

/// Encode a gradient RGB JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// Write a JPEG with no EXIF block.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Write a JPEG whose APP1 segment carries the given EXIF fields.
pub fn write_jpeg_with_exif(path: &Path, width: u32, height: u32, fields: &[Field]) {
    std::fs::write(path, with_exif(&jpeg_bytes(width, height), fields)).unwrap();
}

/// Splice an `Exif\0\0` APP1 segment in directly after the SOI marker.
pub fn with_exif(jpeg: &[u8], fields: &[Field]) -> Vec<u8> {
    let mut writer = exif::experimental::Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let segment_len = u16::try_from(tiff.len() + 8).unwrap();
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

