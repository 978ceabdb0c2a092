use super::RenderError;

const PAD_FRACTION: f64 = 0.05;
pub const MIN_WIDTH: u32 = 320;
pub const MIN_HEIGHT: u32 = 240;
/// Largest accepted side in pixels; bigger requests are refused rather
/// than allocated.
pub const MAX_SIDE: u32 = 8192;

/// Pad a data range so points do not sit on the frame.
///
/// A zero-width range is widened by ±0.5; no data gives `[0, 1]`.
pub fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if hi - lo <= f64::EPSILON * hi.abs().max(1.0) => (lo - 0.5, hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * PAD_FRACTION;
            (lo - pad, hi + pad)
        }
    }
}

/// Brightness axis as handed to the chart: `max..min` for magnitudes so
/// smaller (brighter) values end up at the top.
pub fn brightness_axis(range: Option<(f64, f64)>, inverted: bool) -> std::ops::Range<f64> {
    let (lo, hi) = padded_range(range);
    if inverted {
        hi..lo
    } else {
        lo..hi
    }
}

/// Image size in pixels: small requests are raised to the minimum, huge
/// ones are rejected.
pub fn image_size(width: u32, height: u32) -> Result<(u32, u32), RenderError> {
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(RenderError::TooLarge { width, height });
    }
    Ok((width.max(MIN_WIDTH), height.max(MIN_HEIGHT)))
}
