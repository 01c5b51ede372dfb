//! Per-pixel brightness extraction.

use image::Rgba;

/// Brightness of one pixel as the plain average of its colour channels.
///
/// Alpha is ignored: a fully transparent black pixel reads as 0.
///
/// # Returns
/// A value in 0.0..=255.0
#[inline]
pub fn pixel_brightness(pixel: &Rgba<u8>) -> f64 {
    let [r, g, b, _] = pixel.0;
    (r as f64 + g as f64 + b as f64) / 3.0
}
