//! Static frame renderer: raster image to a grid of palette symbols.
//!
//! The pipeline for one frame:
//!
//! 1. **Resampling** - shrink the raster to one pixel per output cell
//! 2. **Brightness** - average of R, G and B per cell
//! 3. **Curve mapping** - remap brightness through the request's tone curve
//! 4. **Symbol selection** - neutral extremes, directional symbols on
//!    horizontal edges, uniform mapping elsewhere
//!
//! Output rows are newline-terminated.

mod dimensions;
mod downsample;
mod grayscale;
mod select;

use std::sync::Arc;

use image::RgbaImage;

use crate::curve::Curve;
use crate::palette::Palette;

pub use dimensions::{calculate_cell_height, DEFAULT_CELL_ASPECT_RATIO};
pub use downsample::{downsample_area, resample, ResampleFilter};
pub use grayscale::pixel_brightness;
pub use select::{
    directional_index, gradient_direction, select_symbol, uniform_index, BRIGHT_THRESHOLD,
    DARK_THRESHOLD, GRADIENT_THRESHOLD,
};

/// Upper bound on the requested cell width.
pub const MAX_CELL_WIDTH: u32 = 1000;

/// Errors from rendering a single frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("cell width must be at least 1")]
    ZeroCellWidth,

    #[error("cell width {requested} exceeds the maximum of {max}")]
    CellWidthTooLarge { requested: u32, max: u32 },

    #[error("cell height must be at least 1")]
    ZeroCellHeight,

    #[error("source raster is empty ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
}

/// Everything needed to turn a raster into text, apart from the raster.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Output width in cells
    pub cell_width: u32,
    /// Output height in cells; derived from the source aspect ratio if unset
    pub cell_height: Option<u32>,
    /// Invert brightness before choosing symbols
    pub inverted: bool,
    /// Tone curve; identity when it has fewer than two points
    pub curve: Curve,
    /// Symbols to draw with
    pub palette: Arc<Palette>,
    /// Scaling algorithm for the cell grid
    pub resample: ResampleFilter,
    /// Cell height / width, used when deriving the row count
    pub cell_aspect: f64,
}

impl RenderRequest {
    pub fn new(cell_width: u32, palette: Arc<Palette>) -> Self {
        Self {
            cell_width,
            cell_height: None,
            inverted: false,
            curve: Curve::identity(),
            palette,
            resample: ResampleFilter::default(),
            cell_aspect: DEFAULT_CELL_ASPECT_RATIO,
        }
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    pub fn cell_height(mut self, cell_height: u32) -> Self {
        self.cell_height = Some(cell_height);
        self
    }

    pub fn resample(mut self, filter: ResampleFilter) -> Self {
        self.resample = filter;
        self
    }

    pub fn cell_aspect(mut self, cell_aspect: f64) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }

    /// Validate the request against a source size and work out the grid.
    ///
    /// # Returns
    /// `(columns, rows)` of the output grid
    pub fn grid_for(&self, img_width: u32, img_height: u32) -> Result<(u32, u32), RenderError> {
        if self.cell_width == 0 {
            return Err(RenderError::ZeroCellWidth);
        }
        if self.cell_width > MAX_CELL_WIDTH {
            return Err(RenderError::CellWidthTooLarge {
                requested: self.cell_width,
                max: MAX_CELL_WIDTH,
            });
        }
        if img_width == 0 || img_height == 0 {
            return Err(RenderError::EmptyRaster {
                width: img_width,
                height: img_height,
            });
        }

        let rows = match self.cell_height {
            Some(0) => return Err(RenderError::ZeroCellHeight),
            Some(rows) => rows,
            None => calculate_cell_height(
                img_width,
                img_height,
                self.cell_width,
                self.cell_aspect,
            ),
        };

        Ok((self.cell_width, rows))
    }
}

/// Render one raster frame to text.
///
/// # Returns
/// `rows` lines of `cell_width` symbols, each line ending in `\n`.
pub fn render(raster: &RgbaImage, request: &RenderRequest) -> Result<String, RenderError> {
    let (cols, rows) = request.grid_for(raster.width(), raster.height())?;
    let cells = resample(raster, cols, rows, request.resample);

    let levels: Vec<f64> = cells
        .pixels()
        .map(|pixel| request.curve.apply(pixel_brightness(pixel)))
        .collect();

    let cols = cols as usize;
    let rows = rows as usize;
    let palette = request.palette.as_ref();
    let widest = palette.symbols().iter().map(String::len).max().unwrap_or(1);
    let mut out = String::with_capacity(rows * (cols * widest + 1));

    for row in levels.chunks_exact(cols) {
        for (x, &level) in row.iter().enumerate() {
            let mut nb = level;
            let mut right = row.get(x + 1).copied();
            if request.inverted {
                nb = 1.0 - nb;
                right = right.map(|r| 1.0 - r);
            }
            out.push_str(select_symbol(palette, nb, right));
        }
        out.push('\n');
    }

    log::debug!("Rendered {}x{} cell frame with palette '{}'", cols, rows, palette.id());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteRegistry;
    use image::Rgba;

    fn palette(id: &str) -> Arc<Palette> {
        PaletteRegistry::with_builtins().require(id).unwrap()
    }

    #[test]
    fn test_grid_for_derives_height() {
        let request = RenderRequest::new(10, palette("moon"));
        assert_eq!(request.grid_for(200, 100), Ok((10, 5)));
    }

    #[test]
    fn test_grid_for_explicit_height() {
        let request = RenderRequest::new(10, palette("moon")).cell_height(3);
        assert_eq!(request.grid_for(200, 100), Ok((10, 3)));
    }

    #[test]
    fn test_grid_for_rejects_bad_requests() {
        let p = palette("moon");
        assert_eq!(
            RenderRequest::new(0, p.clone()).grid_for(10, 10),
            Err(RenderError::ZeroCellWidth)
        );
        assert_eq!(
            RenderRequest::new(MAX_CELL_WIDTH + 1, p.clone()).grid_for(10, 10),
            Err(RenderError::CellWidthTooLarge {
                requested: MAX_CELL_WIDTH + 1,
                max: MAX_CELL_WIDTH
            })
        );
        assert_eq!(
            RenderRequest::new(5, p.clone()).cell_height(0).grid_for(10, 10),
            Err(RenderError::ZeroCellHeight)
        );
        assert_eq!(
            RenderRequest::new(5, p).grid_for(0, 10),
            Err(RenderError::EmptyRaster { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_black_image_is_all_neutral_dark() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        let out = render(&image, &RenderRequest::new(4, palette("moon"))).unwrap();
        assert_eq!(out, "🌑🌑🌑🌑\n".repeat(4));
    }

    #[test]
    fn test_inverted_black_image_is_all_neutral_bright() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        let request = RenderRequest::new(4, palette("moon")).inverted(true);
        assert_eq!(render(&image, &request).unwrap(), "🌕🌕🌕🌕\n".repeat(4));
    }

    #[test]
    fn test_edge_uses_directional_symbols() {
        // Two cells: mid-dark on the left, mid-bright on the right
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([102, 102, 102, 255])); // 0.4
        image.put_pixel(1, 0, Rgba([204, 204, 204, 255])); // 0.8
        let out = render(&image, &RenderRequest::new(2, palette("moon"))).unwrap();
        // Left cell: right neighbour brighter -> right-lit index floor(1.2) = 1
        // Right cell: no neighbour -> uniform floor(0.8 * 7) = 5
        assert_eq!(out, "🌓🌖\n");
    }

    #[test]
    fn test_ascii_palette_row() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([128, 128, 128, 255]));
        image.put_pixel(2, 0, Rgba([255, 255, 255, 255]));
        let out = render(&image, &RenderRequest::new(3, palette("blocks"))).unwrap();
        // middle: 128/255 * 4 = 2.007 -> index 2
        assert_eq!(out, " ▒█\n");
    }
}
