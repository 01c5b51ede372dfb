//! Font-backed glyph rasterizer.
//!
//! Uses fontdue for simple, fast rasterization. Glyph coverage is painted as
//! white ink on an opaque black canvas, so a symbol that covers more of its
//! cell measures brighter.
//!
//! The canvas is never transparent: every pixel passes the alpha > 0 filter
//! in [`super::measure_brightness`], so the result is ink coverage over the
//! whole cell rather than an average of the drawn pixels only.

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};

use super::{GlyphRasterizer, RasterizeError};

/// Errors that can occur while loading a font.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse font: {0}")]
    Parse(String),
}

/// Rasterizes symbols with a single TrueType/OpenType font.
pub struct FontRasterizer {
    font: Font,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontRasterizer {
    /// Load a font file.
    pub fn open(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rasterizer = Self::from_bytes(&data)?;
        log::info!("Loaded font: {}", path.display());
        Ok(rasterizer)
    }

    /// Parse font data already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;
        Ok(Self { font })
    }
}

/// Zero-width joiners and variation selectors carry no ink of their own.
fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FE00}'..='\u{FE0F}' | '\u{20E3}')
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, symbol: &str, size: u32) -> Result<RgbaImage, RasterizeError> {
        if size == 0 {
            return Err(RasterizeError::ZeroSize);
        }

        let px = size as f32;
        let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255]));

        // Glyphs the font lacks would otherwise draw as the .notdef box
        let glyphs: Vec<_> = symbol
            .chars()
            .filter(|&c| !is_zero_width(c) && self.font.lookup_glyph_index(c) != 0)
            .map(|c| self.font.rasterize(c, px))
            .collect();

        if glyphs.is_empty() {
            log::debug!("Font has no glyphs for '{}'", symbol);
            return Ok(canvas);
        }

        // Centre the run horizontally on its advance width
        let advance: f32 = glyphs.iter().map(|(m, _)| m.advance_width).sum();
        let mut pen_x = (px - advance) / 2.0;

        // Centre vertically on the line box
        let (ascent, descent) = self
            .font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -px * 0.2));
        let baseline = (px - (ascent - descent)) / 2.0 + ascent;

        for (metrics, bitmap) in &glyphs {
            let left = (pen_x + metrics.xmin as f32).round() as i64;
            let top = (baseline - (metrics.height as f32 + metrics.ymin as f32)).round() as i64;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let x = left + gx as i64;
                    let y = top + gy as i64;
                    if x < 0 || y < 0 || x >= size as i64 || y >= size as i64 {
                        continue;
                    }
                    let coverage = bitmap[gy * metrics.width + gx];
                    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                    // Overlapping glyphs keep the stronger coverage
                    let value = pixel.0[0].max(coverage);
                    *pixel = Rgba([value, value, value, 255]);
                }
            }

            pen_x += metrics.advance_width;
        }

        Ok(canvas)
    }
}
