//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::Resample;
use crate::curve::Point;

/// Turn images and animated GIFs into grids of emoji or text symbols
#[derive(Parser, Debug)]
#[command(name = "emoji-mosaic")]
#[command(version, about = "Render images as emoji mosaics", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image or GIF and print the result
    Convert(ConvertArgs),
    /// Convert an animation and play it in the terminal
    Play(PlayArgs),
    /// List available palettes
    Palettes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Measure how bright symbols look when drawn
    Analyze(AnalyzeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by every command that renders an image.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Output width in cells (default from config)
    #[arg(long, short)]
    pub width: Option<u32>,

    /// Output height in cells (default: keep aspect ratio)
    #[arg(long)]
    pub height: Option<u32>,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Palette id (see `palettes`)
    #[arg(long, short)]
    pub palette: Option<String>,

    /// Build a palette from these symbols, ordered by measured brightness
    #[arg(long, num_args = 1.., conflicts_with = "palette")]
    pub symbols: Vec<String>,

    /// Curve control point as X,Y (repeatable)
    #[arg(long = "curve", value_name = "X,Y", num_args = 1..)]
    pub curve: Vec<Point>,

    /// Height of the curve editor the points were placed in
    #[arg(long)]
    pub curve_height: Option<f64>,

    /// Scaling algorithm
    #[arg(long)]
    pub resample: Option<Resample>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ConvertArgs {
    /// Image or GIF to convert
    pub file: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Write the result to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PlayArgs {
    /// Image or GIF to play
    pub file: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Frames per second (default from config)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Stop after this many loops (default: until Ctrl+C)
    #[arg(long)]
    pub loops: Option<u32>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Symbols to measure
    #[arg(required = true)]
    pub symbols: Vec<String>,

    /// Font to draw symbols with (default from config)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Canvas size and font size in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
