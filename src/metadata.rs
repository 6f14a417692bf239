//! Capture metadata read from a photo's EXIF block.
//!
//! Extraction and validation are two separate steps:
//!
//! 1. **Extraction** ([`imaging::exif_reader`](crate::imaging::exif_reader))
//!    fills a [`RawMetadata`] record. Every field is optional because any
//!    camera may omit any tag; tags the gallery has no use for are dropped.
//! 2. **Validation** ([`RawMetadata::require`]) turns the record into a
//!    [`CaptureMetadata`], where every field the caption needs is present.
//!    The first absent field becomes a [`MetadataError::MissingField`] naming
//!    the EXIF tag, so there is no silent defaulting. A tag that was present
//!    with the wrong value type is an [`MetadataError::InvalidField`] instead.
//!
//! ## Field mapping
//!
//! | Field | EXIF tag | Encoding |
//! |---|---|---|
//! | `sensitivity` | `PhotographicSensitivity` (ex `ISOSpeedRatings`) | SHORT |
//! | `model` | `Model` | ASCII |
//! | `shutter_speed` | `ShutterSpeedValue` | SRATIONAL, APEX `Tv` |
//! | `aperture` | `ApertureValue` | RATIONAL, APEX `Av` |
//! | `focal_length` | `FocalLength` | RATIONAL, millimeters |
//! | `digitized_at` | `DateTimeDigitized` | ASCII, `YYYY:MM:DD HH:MM:SS` |

use std::fmt;
use thiserror::Error;

pub const SENSITIVITY: &str = "PhotographicSensitivity";
pub const MODEL: &str = "Model";
pub const SHUTTER_SPEED: &str = "ShutterSpeedValue";
pub const APERTURE: &str = "ApertureValue";
pub const FOCAL_LENGTH: &str = "FocalLength";
pub const DIGITIZED_AT: &str = "DateTimeDigitized";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataError {
    #[error("image has no EXIF metadata block")]
    NoExifBlock,
    #[error("missing required EXIF field {0}")]
    MissingField(&'static str),
    #[error("invalid EXIF field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl MetadataError {
    /// True for the "missing metadata" category (no block, or a required tag absent).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NoExifBlock | Self::MissingField(_))
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// A signed EXIF rational, kept exactly as stored.
///
/// Unsigned `RATIONAL` values widen losslessly into the same type, so the
/// converters only deal with one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

impl Rational {
    pub fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Value as `f64`. A zero denominator is an invalid encoding of `field`.
    pub fn to_f64(self, field: &'static str) -> Result<f64, MetadataError> {
        if self.den == 0 {
            return Err(MetadataError::invalid(field, "zero denominator"));
        }
        Ok(self.num as f64 / self.den as f64)
    }
}

impl From<exif::Rational> for Rational {
    fn from(r: exif::Rational) -> Self {
        Self::new(r.num.into(), r.denom.into())
    }
}

impl From<exif::SRational> for Rational {
    fn from(r: exif::SRational) -> Self {
        Self::new(r.num.into(), r.denom.into())
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Capture fields as extracted, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub sensitivity: Option<u32>,
    pub model: Option<String>,
    pub shutter_speed: Option<Rational>,
    pub aperture: Option<Rational>,
    pub focal_length: Option<Rational>,
    pub digitized_at: Option<String>,
    /// Tags that were present but carried an unexpected value type.
    pub mistyped: Vec<&'static str>,
}

/// Capture fields with every required value present.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureMetadata {
    pub sensitivity: u32,
    pub model: String,
    pub shutter_speed: Rational,
    pub aperture: Rational,
    pub focal_length: Rational,
    pub digitized_at: String,
}

impl RawMetadata {
    /// Validate that every required field is present.
    ///
    /// Fields are checked in the order of the table in the module docs, so
    /// the reported field is deterministic when several are missing.
    pub fn require(&self) -> Result<CaptureMetadata, MetadataError> {
        Ok(CaptureMetadata {
            sensitivity: self.field(&self.sensitivity, SENSITIVITY)?,
            model: self.field(&self.model, MODEL)?,
            shutter_speed: self.field(&self.shutter_speed, SHUTTER_SPEED)?,
            aperture: self.field(&self.aperture, APERTURE)?,
            focal_length: self.field(&self.focal_length, FOCAL_LENGTH)?,
            digitized_at: self.field(&self.digitized_at, DIGITIZED_AT)?,
        })
    }

    fn field<T: Clone>(&self, value: &Option<T>, name: &'static str) -> Result<T, MetadataError> {
        match value {
            Some(v) => Ok(v.clone()),
            None if self.mistyped.contains(&name) => {
                Err(MetadataError::invalid(name, "unexpected value type"))
            }
            None => Err(MetadataError::MissingField(name)),
        }
    }
}
