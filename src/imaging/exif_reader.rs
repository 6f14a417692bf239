//! EXIF extraction via `kamadak-exif`.
//!
//! Reads the EXIF block from a JPEG (APP1 `Exif\0\0` segment) or TIFF
//! container and maps the primary-image fields the gallery uses onto a
//! [`RawMetadata`] record. Fields from the thumbnail IFD and tags the
//! gallery has no use for are dropped, so cameras writing extra or
//! vendor-specific tags do not break extraction.
//!
//! A file without an EXIF block fails with [`MetadataError::NoExifBlock`];
//! a block that cannot be parsed fails with
//! [`MetadataError::InvalidField`].

use super::backend::BackendError;
use crate::metadata::{
    APERTURE, DIGITIZED_AT, FOCAL_LENGTH, MODEL, MetadataError, RawMetadata, Rational, SENSITIVITY,
    SHUTTER_SPEED,
};
use exif::{Field, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read and map the EXIF block of the image at `path`.
pub fn read_raw_metadata(path: &Path) -> Result<RawMetadata, BackendError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(from_fields(exif.fields())),
        Err(exif::Error::NotFound(_)) => Err(MetadataError::NoExifBlock.into()),
        Err(exif::Error::Io(e)) => Err(BackendError::Io(e)),
        Err(e) => Err(MetadataError::invalid("Exif", e.to_string()).into()),
    }
}

/// Map primary-IFD fields onto a [`RawMetadata`] record.
///
/// A known tag with the wrong value type is left unset and listed in
/// [`RawMetadata::mistyped`].
pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a Field>) -> RawMetadata {
    let mut raw = RawMetadata::default();
    for field in fields.into_iter().filter(|f| f.ifd_num == In::PRIMARY) {
        let value = &field.value;
        let (name, typed) = match field.tag {
            Tag::PhotographicSensitivity => (SENSITIVITY, store(&mut raw.sensitivity, uint(value))),
            Tag::Model => (MODEL, store(&mut raw.model, ascii(value))),
            Tag::ShutterSpeedValue => (SHUTTER_SPEED, store(&mut raw.shutter_speed, rational(value))),
            Tag::ApertureValue => (APERTURE, store(&mut raw.aperture, rational(value))),
            Tag::FocalLength => (FOCAL_LENGTH, store(&mut raw.focal_length, rational(value))),
            Tag::DateTimeDigitized => (DIGITIZED_AT, store(&mut raw.digitized_at, ascii(value))),
            _ => continue,
        };
        if !typed {
            raw.mistyped.push(name);
        }
    }
    raw
}

/// Store a well-typed value; `None` means the value type did not match.
fn store<T>(slot: &mut Option<T>, value: Option<Option<T>>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

fn uint(value: &Value) -> Option<Option<u32>> {
    match value {
        Value::Byte(_) | Value::Short(_) | Value::Long(_) => Some(value.get_uint(0)),
        _ => None,
    }
}

/// First ASCII component, with NUL padding and surrounding blanks removed.
fn ascii(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Ascii(parts) => Some(
            parts
                .first()
                .map(|bytes| {
                    String::from_utf8_lossy(bytes)
                        .trim_end_matches('\0')
                        .trim()
                        .to_string()
                })
                .filter(|s| !s.is_empty()),
        ),
        _ => None,
    }
}

fn rational(value: &Value) -> Option<Option<Rational>> {
    match value {
        Value::Rational(v) => Some(v.first().map(|&r| r.into())),
        Value::SRational(v) => Some(v.first().map(|&r| r.into())),
        _ => None,
    }
}
