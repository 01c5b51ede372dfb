//! Conversion pipeline façade.
//!
//! [`Converter`] is the entry point for turning image bytes into text. It
//! owns the palette registry and the optional glyph rasterizer, picks the
//! still or animated path, and applies the fallback rules when animation
//! decoding fails.

use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;

use crate::analyzer::{self, GlyphRasterizer, SymbolBrightness};
use crate::animation::{decode_frames, AnimationError};
use crate::palette::{Palette, PaletteError, PaletteRegistry};
use crate::render::{render, RenderError, RenderRequest};

/// Returned instead of a still rendering when no raster surface exists.
pub const HEADLESS_STILL_PLACEHOLDER: &str =
    "Headless context - image processing not available";

/// Returned instead of animation frames when no raster surface exists.
pub const HEADLESS_ANIMATION_PLACEHOLDER: &str =
    "Headless context - animation processing not available";

/// Whether raster work can be done in this context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Images are decoded and rendered normally
    #[default]
    Raster,
    /// No raster work; every conversion returns a labelled placeholder
    Headless,
}

/// Errors that reach the caller. Animation problems never do: they fall
/// back to the still path.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to load image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to render image: {0}")]
    Render(#[from] RenderError),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Output of [`Converter::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Still(String),
    Animated(Vec<String>),
}

impl Conversion {
    /// All frames in order; a still is a single frame.
    pub fn frames(&self) -> Vec<&str> {
        match self {
            Conversion::Still(text) => vec![text.as_str()],
            Conversion::Animated(frames) => frames.iter().map(String::as_str).collect(),
        }
    }

    pub fn into_frames(self) -> Vec<String> {
        match self {
            Conversion::Still(text) => vec![text],
            Conversion::Animated(frames) => frames,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Conversion::Animated(_))
    }
}

/// Image-to-text converter.
pub struct Converter {
    registry: PaletteRegistry,
    surface: Surface,
    rasterizer: Option<Box<dyn GlyphRasterizer + Send + Sync>>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("palettes", &self.registry.len())
            .field("surface", &self.surface)
            .field("rasterizer", &self.rasterizer.is_some())
            .finish()
    }
}

impl Converter {
    /// A raster-capable converter with the built-in palettes and no glyph
    /// rasterizer.
    pub fn new() -> Self {
        Self {
            registry: PaletteRegistry::with_builtins(),
            surface: Surface::Raster,
            rasterizer: None,
        }
    }

    /// A converter that only ever produces placeholders.
    pub fn headless() -> Self {
        Self::new().with_surface(Surface::Headless)
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_registry(mut self, registry: PaletteRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use `rasterizer` to measure symbol brightness for custom palettes.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn GlyphRasterizer + Send + Sync>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn registry(&self) -> &PaletteRegistry {
        &self.registry
    }

    fn rasterizer(&self) -> Option<&dyn GlyphRasterizer> {
        match self.surface {
            Surface::Headless => None,
            Surface::Raster => self
                .rasterizer
                .as_deref()
                .map(|r| r as &dyn GlyphRasterizer),
        }
    }

    /// Look up a palette by id, or the default palette when `id` is `None`.
    ///
    /// Unknown ids are an error.
    pub fn palette(&self, id: Option<&str>) -> Result<Arc<Palette>, PaletteError> {
        match id {
            Some(id) => self.registry.require(id),
            None => self
                .registry
                .default_palette()
                .ok_or_else(|| PaletteError::NotFound(crate::palette::DEFAULT_PALETTE_ID.to_string())),
        }
    }

    /// Measure symbol brightness, darkest first.
    pub fn analyze_brightness<S: AsRef<str>>(&self, symbols: &[S], size: u32) -> Vec<SymbolBrightness> {
        analyzer::analyze_brightness(symbols, size, self.rasterizer())
    }

    /// Build a palette ordered by measured brightness and append it to the
    /// registry.
    pub fn create_custom_palette<S: AsRef<str>>(
        &self,
        id: &str,
        name: &str,
        symbols: &[S],
        description: Option<&str>,
    ) -> Result<Arc<Palette>, PaletteError> {
        let palette =
            analyzer::create_custom_palette(id, name, symbols, description, self.rasterizer())?;
        self.registry.register(palette)
    }

    /// Convert a still image.
    pub async fn convert_still(
        &self,
        bytes: &[u8],
        request: &RenderRequest,
    ) -> Result<String, ConvertError> {
        if self.surface == Surface::Headless {
            return Ok(HEADLESS_STILL_PLACEHOLDER.to_string());
        }

        let raster = image::load_from_memory(bytes)?.to_rgba8();
        tokio::task::yield_now().await;

        Ok(render(&raster, request)?)
    }

    /// Convert an animation into one text frame per source frame (at most
    /// [`crate::animation::MAX_FRAMES`]).
    ///
    /// Input that isn't a multi-frame animation, or that fails to decode as
    /// one, is converted as a still and returned as a single frame.
    pub async fn convert_animated(
        &self,
        bytes: &[u8],
        request: &RenderRequest,
    ) -> Result<Vec<String>, ConvertError> {
        if self.surface == Surface::Headless {
            return Ok(vec![HEADLESS_ANIMATION_PLACEHOLDER.to_string()]);
        }

        match decode_frames(bytes, request).await {
            Ok(animation) if animation.source_frames > 1 => return Ok(animation.frames),
            Ok(_) => log::debug!("Single-frame input, converting as a still image"),
            Err(AnimationError::Parse(e)) => {
                log::warn!("Error processing GIF ({}), falling back to static image", e)
            }
            Err(e) => log::warn!("{}, falling back to static image", e),
        }

        let still = self.convert_still(bytes, request).await?;
        Ok(vec![still])
    }

    /// Convert any supported input, choosing the animated path for GIFs.
    pub async fn convert(
        &self,
        bytes: &[u8],
        request: &RenderRequest,
    ) -> Result<Conversion, ConvertError> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Gif) => Ok(Conversion::Animated(
                self.convert_animated(bytes, request).await?,
            )),
            _ => Ok(Conversion::Still(self.convert_still(bytes, request).await?)),
        }
    }

    /// Read a file and [`Converter::convert`] it.
    pub async fn convert_file(
        &self,
        path: &Path,
        request: &RenderRequest,
    ) -> Result<Conversion, ConvertError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.convert(&bytes, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn request(converter: &Converter, width: u32) -> RenderRequest {
        RenderRequest::new(width, converter.palette(None).unwrap())
    }

    #[tokio::test]
    async fn test_convert_still_png() {
        let converter = Converter::new();
        let bytes = png_bytes(&RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 255])));
        let text = converter
            .convert_still(&bytes, &request(&converter, 10))
            .await
            .unwrap();
        // 2:1 source, 10 wide -> 5 rows
        assert_eq!(text, ("🌑".repeat(10) + "\n").repeat(5));
    }

    #[tokio::test]
    async fn test_convert_still_rejects_garbage() {
        let converter = Converter::new();
        let err = converter
            .convert_still(b"garbage", &request(&converter, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }

    #[tokio::test]
    async fn test_headless_placeholders() {
        let converter = Converter::headless();
        let req = request(&converter, 10);
        assert_eq!(
            converter.convert_still(b"anything", &req).await.unwrap(),
            HEADLESS_STILL_PLACEHOLDER
        );
        assert_eq!(
            converter.convert_animated(b"anything", &req).await.unwrap(),
            vec![HEADLESS_ANIMATION_PLACEHOLDER.to_string()]
        );
    }

    #[tokio::test]
    async fn test_convert_picks_still_for_png() {
        let converter = Converter::new();
        let bytes = png_bytes(&RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])));
        let result = converter.convert(&bytes, &request(&converter, 2)).await.unwrap();
        assert_eq!(result, Conversion::Still("🌕🌕\n🌕🌕\n".to_string()));
        assert!(!result.is_animated());
    }

    #[test]
    fn test_palette_lookup() {
        let converter = Converter::new();
        assert_eq!(converter.palette(None).unwrap().id(), "moon");
        assert_eq!(converter.palette(Some("hearts")).unwrap().id(), "hearts");
        assert!(matches!(
            converter.palette(Some("nope")),
            Err(PaletteError::NotFound(_))
        ));
    }

    #[test]
    fn test_custom_palette_registered() {
        let converter = Converter::headless();
        let palette = converter
            .create_custom_palette("mine", "Mine", &["a", "b", "c"], None)
            .unwrap();
        assert_eq!(palette.symbols(), &["a", "b", "c"]);
        assert_eq!(converter.palette(Some("mine")).unwrap().id(), "mine");
    }

    #[test]
    fn test_headless_analysis_is_linear() {
        let converter = Converter::headless();
        let result = converter.analyze_brightness(&["a", "b", "c"], 32);
        let values: Vec<f64> = result.iter().map(|s| s.brightness).collect();
        assert_eq!(values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_conversion_frames() {
        let still = Conversion::Still("a\n".to_string());
        assert_eq!(still.frames(), vec!["a\n"]);
        let animated = Conversion::Animated(vec!["a\n".to_string(), "b\n".to_string()]);
        assert_eq!(animated.clone().into_frames().len(), 2);
        assert!(animated.is_animated());
    }
}
