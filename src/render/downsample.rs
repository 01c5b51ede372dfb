//! Resampling raster frames to the cell grid.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::Deserialize;

/// Scaling algorithm used to shrink (or grow) a raster to one pixel per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Average of all source pixels covered by the cell
    #[default]
    Area,
    /// Bilinear interpolation
    Bilinear,
    /// Nearest source pixel
    Nearest,
}

impl ResampleFilter {
    pub fn name(&self) -> &'static str {
        match self {
            ResampleFilter::Area => "area",
            ResampleFilter::Bilinear => "bilinear",
            ResampleFilter::Nearest => "nearest",
        }
    }
}

/// Resample `image` to exactly `cell_width` x `cell_height` pixels.
///
/// Returns an empty image when either the source or the target is empty.
pub fn resample(
    image: &RgbaImage,
    cell_width: u32,
    cell_height: u32,
    filter: ResampleFilter,
) -> RgbaImage {
    if cell_width == 0 || cell_height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(0, 0);
    }

    match filter {
        ResampleFilter::Area => downsample_area(image, cell_width, cell_height),
        ResampleFilter::Bilinear => {
            imageops::resize(image, cell_width, cell_height, FilterType::Triangle)
        }
        ResampleFilter::Nearest => {
            imageops::resize(image, cell_width, cell_height, FilterType::Nearest)
        }
    }
}

/// Downsample by averaging every source pixel that falls inside each cell.
///
/// Each cell covers at least one source pixel, so upscaling degrades to
/// nearest-neighbour instead of producing empty cells.
pub fn downsample_area(image: &RgbaImage, cell_width: u32, cell_height: u32) -> RgbaImage {
    let img_width = image.width();
    let img_height = image.height();
    let mut result = RgbaImage::new(cell_width, cell_height);

    if img_width == 0 || img_height == 0 {
        return result;
    }

    // Size of each cell in source pixels (floats for accurate mapping)
    let cell_w = img_width as f32 / cell_width as f32;
    let cell_h = img_height as f32 / cell_height as f32;

    for cy in 0..cell_height {
        let (start_y, end_y) = span(cy, cell_h, img_height);
        for cx in 0..cell_width {
            let (start_x, end_x) = span(cx, cell_w, img_width);

            let mut sum = [0u32; 4];
            let mut count = 0u32;

            for py in start_y..end_y {
                for px in start_x..end_x {
                    let pixel = image.get_pixel(px, py);
                    for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                        *acc += channel as u32;
                    }
                    count += 1;
                }
            }

            let average = if count > 0 {
                Rgba([
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                    (sum[3] / count) as u8,
                ])
            } else {
                Rgba([0, 0, 0, 0])
            };
            result.put_pixel(cx, cy, average);
        }
    }

    result
}

/// Source pixel range `[start, end)` covered by cell `index`.
fn span(index: u32, cell_size: f32, limit: u32) -> (u32, u32) {
    let start = ((index as f32 * cell_size) as u32).min(limit - 1);
    let end = (((index + 1) as f32 * cell_size) as u32).clamp(start + 1, limit);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn test_output_dimensions() {
        let image = gray(640, 480, 100);
        for filter in [ResampleFilter::Area, ResampleFilter::Bilinear, ResampleFilter::Nearest] {
            let out = resample(&image, 40, 30, filter);
            assert_eq!(out.dimensions(), (40, 30), "filter {}", filter.name());
        }
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let image = gray(100, 100, 128);
        let out = resample(&image, 10, 10, ResampleFilter::Area);
        assert!(out.pixels().all(|p| p.0 == [128, 128, 128, 255]));
    }

    #[test]
    fn test_area_averages_cell() {
        // 2x1 image, left black right white -> 1x1 average
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        let out = downsample_area(&image, 1, 1);
        assert_eq!(out.get_pixel(0, 0).0, [100, 50, 25, 255]);
    }

    #[test]
    fn test_area_preserves_halves() {
        // Left half dark, right half bright
        let mut image = gray(20, 10, 0);
        for y in 0..10 {
            for x in 10..20 {
                image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let out = downsample_area(&image, 2, 1);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_area_upscale_has_no_empty_cells() {
        let image = gray(2, 2, 77);
        let out = downsample_area(&image, 7, 5);
        assert!(out.pixels().all(|p| p.0 == [77, 77, 77, 255]));
    }

    #[test]
    fn test_empty_inputs() {
        let image = gray(10, 10, 1);
        assert_eq!(resample(&image, 0, 5, ResampleFilter::Area).dimensions(), (0, 0));
        let empty = RgbaImage::new(0, 0);
        assert_eq!(resample(&empty, 5, 5, ResampleFilter::Nearest).dimensions(), (0, 0));
    }
}
