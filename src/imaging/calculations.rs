//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate thumbnail dimensions that fit inside a bounding box.
///
/// The source aspect ratio is preserved and neither output dimension
/// exceeds the bound. Images that already fit are returned unchanged
/// (thumbnails never upscale). The constrained side is rounded to
/// whichever of floor/ceil keeps the aspect ratio closest to the source,
/// and is never less than 1.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bound` - Bounding box (max width, max height)
///
/// # Returns
/// * `(width, height)` - Thumbnail dimensions
pub fn calculate_fit_dimensions(source: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bound;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let aspect = src_w as f64 / src_h as f64;
    if max_w as f64 / max_h as f64 >= aspect {
        // Box is relatively wider: height is the constraint
        let h = max_h as f64;
        let w = round_aspect(h * aspect, |n| (aspect - n / h).abs());
        (w, max_h)
    } else {
        // Box is relatively taller: width is the constraint
        let w = max_w as f64;
        let h = round_aspect(w / aspect, |n| (aspect - w / n).abs());
        (max_w, h)
    }
}

/// Pick floor or ceil of `value`, whichever minimizes `error`; at least 1.
fn round_aspect(value: f64, error: impl Fn(f64) -> f64) -> u32 {
    let floor = value.floor().max(1.0);
    let ceil = value.ceil().max(1.0);
    let best = if error(floor) <= error(ceil) { floor } else { ceil };
    best as u32
}
