//! Shooting parameters derived from APEX-encoded EXIF values.
//!
//! EXIF stores exposure-related values in the APEX system (Additive System
//! of Photographic Exposure), a base-2 logarithmic encoding:
//!
//! ```text
//! Av = 2 · log2(N)    →  N = sqrt(2^Av)      (f-number)
//! Tv = -log2(t)       →  t = 2^-Tv           (exposure time, seconds)
//! ```
//!
//! Focal length is a plain rational in millimeters.
//!
//! ## Display rules
//!
//! | Value | Shown as | Example |
//! |---|---|---|
//! | exposure < 1 s | closest fraction with denominator ≤ 8000 | `1/256` |
//! | exposure ≥ 1 s, whole | integer seconds | `2` |
//! | exposure ≥ 1 s, fractional | seconds, rounded to two decimals | `1.41`, `3.25` |
//! | f-number | rounded to 2 decimals, at least one shown | `4.0`, `2.83` |
//! | focal length | truncated to whole millimeters | `333` |
//!
//! The full description reads `"1/256 sec; f/4.0 50 mm;"`. The trailing
//! semicolon is part of the format consumed by existing gallery captions.

use crate::metadata::{
    APERTURE, CaptureMetadata, FOCAL_LENGTH, MetadataError, Rational, SHUTTER_SPEED,
};
use std::fmt;

/// Finest shutter dial step: exposures snap to fractions with at most this denominator.
pub const MAX_SHUTTER_DENOMINATOR: u64 = 8000;

/// A non-negative fraction in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numer: u64,
    pub denom: u64,
}

impl Fraction {
    /// Closest fraction to `x` whose denominator does not exceed `max_denominator`.
    ///
    /// `x` is first taken as the exact binary rational the `f64` holds, then
    /// reduced with a continued-fraction expansion; when the expansion runs
    /// past the bound, the better of the last convergent and the best
    /// semiconvergent wins (ties go to the convergent).
    ///
    /// Returns `None` for negative, non-finite or unrepresentably large input.
    pub fn approximate(x: f64, max_denominator: u64) -> Option<Self> {
        if !x.is_finite() || x < 0.0 || x >= 2f64.powi(63) || max_denominator == 0 {
            return None;
        }
        let Some((n, d)) = exact_ratio(x) else {
            // Below 2^-67: zero is the closest representable value.
            return Some(Self { numer: 0, denom: 1 });
        };
        let max = u128::from(max_denominator);
        if d <= max {
            return Self::from_parts(n, d);
        }

        let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
        let (mut n, mut d) = (n, d);
        while d != 0 {
            let a = n / d;
            let q2 = match a.checked_mul(q1).and_then(|aq| aq.checked_add(q0)) {
                Some(q2) if q2 <= max => q2,
                _ => break,
            };
            (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
            (n, d) = (d, n - a * d);
        }

        let k = (max - q0) / q1;
        let semi = (p0 + k * p1, q0 + k * q1);
        let convergent = (p1, q1);
        let distance = |(p, q): (u128, u128)| (p as f64 / q as f64 - x).abs();
        let (p, q) = if distance(convergent) <= distance(semi) {
            convergent
        } else {
            semi
        };
        Self::from_parts(p, q)
    }

    fn from_parts(n: u128, d: u128) -> Option<Self> {
        let g = gcd(n, d).max(1);
        Some(Self {
            numer: u64::try_from(n / g).ok()?,
            denom: u64::try_from(d / g).ok()?,
        })
    }

    pub fn to_f64(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

/// `x` (finite, `0 <= x < 2^63`) as an exact ratio `n / 2^k`, or `None`
/// when `2^k` would exceed `2^120`.
fn exact_ratio(x: f64) -> Option<(u128, u128)> {
    if x == 0.0 {
        return Some((0, 1));
    }
    let bits = x.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };
    let tz = mantissa.trailing_zeros();
    mantissa >>= tz;
    exp += tz as i32;

    if exp >= 0 {
        return Some((u128::from(mantissa) << exp, 1));
    }
    let k = (-exp) as u32;
    (k <= 120).then(|| (u128::from(mantissa), 1u128 << k))
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else if self.numer < self.denom {
            write!(f, "{}/{}", self.numer, self.denom)
        } else {
            write!(f, "{}", (self.to_f64() * 100.0).round() / 100.0)
        }
    }
}

/// Recover the f-number from an APEX aperture value: `N = sqrt(2^Av)`.
pub fn aperture_from_apex(av: Rational) -> Result<f64, MetadataError> {
    let av = av.to_f64(APERTURE)?;
    if av < 0.0 {
        return Err(MetadataError::invalid(APERTURE, "negative aperture value"));
    }
    let n = av.exp2().sqrt();
    if !n.is_finite() {
        return Err(MetadataError::invalid(APERTURE, "aperture out of range"));
    }
    Ok(n)
}

/// Recover the exposure time in seconds from an APEX shutter value: `t = 2^-Tv`.
pub fn exposure_from_apex(tv: Rational) -> Result<f64, MetadataError> {
    let t = (-tv.to_f64(SHUTTER_SPEED)?).exp2();
    if !t.is_finite() || t == 0.0 {
        return Err(MetadataError::invalid(SHUTTER_SPEED, "exposure out of range"));
    }
    Ok(t)
}

/// Whole millimeters, truncated: `333.33` mm reads as `333`.
pub fn focal_length_mm(focal: Rational) -> Result<u32, MetadataError> {
    if focal.den == 0 {
        return Err(MetadataError::invalid(FOCAL_LENGTH, "zero denominator"));
    }
    if focal.num < 0 || focal.den < 0 {
        return Err(MetadataError::invalid(FOCAL_LENGTH, "negative focal length"));
    }
    u32::try_from(focal.num / focal.den)
        .map_err(|_| MetadataError::invalid(FOCAL_LENGTH, "focal length out of range"))
}

/// Exposure, aperture and focal length in conventional photographic units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotParameters {
    /// Exact exposure time in seconds.
    pub exposure_seconds: f64,
    /// Exposure snapped to the shutter dial for display.
    pub exposure: Fraction,
    pub f_number: f64,
    pub focal_length_mm: u32,
}

impl ShotParameters {
    pub fn from_capture(capture: &CaptureMetadata) -> Result<Self, MetadataError> {
        let exposure_seconds = exposure_from_apex(capture.shutter_speed)?;
        let exposure = Fraction::approximate(exposure_seconds, MAX_SHUTTER_DENOMINATOR)
            .ok_or_else(|| MetadataError::invalid(SHUTTER_SPEED, "exposure out of range"))?;
        Ok(Self {
            exposure_seconds,
            exposure,
            f_number: aperture_from_apex(capture.aperture)?,
            focal_length_mm: focal_length_mm(capture.focal_length)?,
        })
    }

    /// f-number rounded to 2 decimals, keeping one decimal for whole stops.
    pub fn f_number_display(&self) -> String {
        let rounded = (self.f_number * 100.0).round() / 100.0;
        if rounded.fract() == 0.0 {
            format!("{:.1}", rounded)
        } else {
            rounded.to_string()
        }
    }
}

impl fmt::Display for ShotParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sec; f/{} {} mm;",
            self.exposure,
            self.f_number_display(),
            self.focal_length_mm
        )
    }
}

/// Convert validated capture metadata into shooting parameters.
pub fn convert(capture: &CaptureMetadata) -> Result<ShotParameters, MetadataError> {
    ShotParameters::from_capture(capture)
}
