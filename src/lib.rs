//! emoji-mosaic library crate.
//!
//! Converts raster images and animated GIFs into grids of emoji or text
//! symbols. [`pipeline::Converter`] is the main entry point.

pub mod analyzer;
pub mod animation;
pub mod cli;
pub mod config;
pub mod curve;
pub mod palette;
pub mod pipeline;
pub mod playback;
pub mod render;

pub use curve::{Curve, Point};
pub use palette::{Palette, PaletteRegistry};
pub use pipeline::{Conversion, ConvertError, Converter, Surface};
pub use render::{render, RenderRequest};
