//! Palette brightness analysis.
//!
//! Measures how bright each symbol looks when drawn, so an arbitrary symbol
//! set can be ordered darkest to brightest and used as a palette.
//!
//! Drawing goes through a [`GlyphRasterizer`]. Without one (headless use)
//! symbols are assigned evenly spaced brightness values in input order.

mod font;

use image::RgbaImage;
use serde::Serialize;

use crate::palette::{Palette, PaletteError};

pub use font::{FontError, FontRasterizer};

/// Default canvas edge length and font size for analysis, in pixels.
pub const DEFAULT_RENDER_SIZE: u32 = 32;

/// Errors from drawing a single symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterizeError {
    #[error("render size must be at least 1 pixel")]
    ZeroSize,

    #[error("failed to rasterize '{symbol}': {message}")]
    Glyph { symbol: String, message: String },
}

/// Something that can draw a symbol onto a square RGBA canvas.
pub trait GlyphRasterizer {
    /// Draw `symbol` centred on a `size` x `size` canvas at font size `size`.
    fn rasterize(&self, symbol: &str, size: u32) -> Result<RgbaImage, RasterizeError>;
}

/// One measured symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolBrightness {
    pub symbol: String,
    /// Average brightness of the drawn symbol, 0.0..=1.0
    pub brightness: f64,
}

/// Average brightness over all pixels with non-zero alpha.
///
/// Each pixel contributes `(r + g + b) / 3 / 255`. A canvas with no opaque
/// pixels has brightness 0.
pub fn measure_brightness(image: &RgbaImage) -> f64 {
    let mut total = 0.0;
    let mut count = 0u64;

    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        if a > 0 {
            total += (r as f64 + g as f64 + b as f64) / 3.0;
            count += 1;
        }
    }

    if count > 0 {
        total / count as f64 / 255.0
    } else {
        0.0
    }
}

/// Evenly spaced brightness values in input order: `i / (n - 1)`.
///
/// A single symbol gets 0.
pub fn linear_brightness<S: AsRef<str>>(symbols: &[S]) -> Vec<SymbolBrightness> {
    let n = symbols.len();
    symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| SymbolBrightness {
            symbol: symbol.as_ref().to_string(),
            brightness: if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 },
        })
        .collect()
}

/// Measure and sort symbols by brightness, darkest first.
///
/// The sort is stable, so symbols of equal brightness keep their input
/// order. With no rasterizer the result is [`linear_brightness`].
pub fn analyze_brightness<S: AsRef<str>>(
    symbols: &[S],
    size: u32,
    rasterizer: Option<&dyn GlyphRasterizer>,
) -> Vec<SymbolBrightness> {
    let Some(rasterizer) = rasterizer else {
        log::debug!(
            "No glyph rasterizer available, using linear brightness for {} symbols",
            symbols.len()
        );
        return linear_brightness(symbols);
    };

    let mut measured: Vec<SymbolBrightness> = symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            let brightness = match rasterizer.rasterize(symbol, size) {
                Ok(canvas) => measure_brightness(&canvas),
                Err(e) => {
                    log::warn!("Treating '{}' as dark: {}", symbol, e);
                    0.0
                }
            };
            SymbolBrightness {
                symbol: symbol.to_string(),
                brightness,
            }
        })
        .collect();

    measured.sort_by(|a, b| a.brightness.total_cmp(&b.brightness));
    measured
}

/// Build a palette whose main sequence is `symbols` sorted by measured
/// brightness. Custom palettes have no directional sub-palettes.
pub fn create_custom_palette<S: AsRef<str>>(
    id: &str,
    name: &str,
    symbols: &[S],
    description: Option<&str>,
    rasterizer: Option<&dyn GlyphRasterizer>,
) -> Result<Palette, PaletteError> {
    let analyzed = analyze_brightness(symbols, DEFAULT_RENDER_SIZE, rasterizer);
    let builder = Palette::builder(id, name, analyzed.into_iter().map(|s| s.symbol));
    let builder = match description {
        Some(description) => builder.description(description),
        None => builder,
    };
    builder.build()
}
