//! Configuration file handling for emoji-mosaic.
//!
//! Loads configuration from `<config dir>/emoji-mosaic/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analyzer::DEFAULT_RENDER_SIZE;
use crate::curve::{Curve, CurveError, Point, DEFAULT_CURVE_HEIGHT};
use crate::palette::DEFAULT_PALETTE_ID;
use crate::playback::DEFAULT_FPS;
use crate::render::{ResampleFilter, DEFAULT_CELL_ASPECT_RATIO};

/// Default output width in cells.
pub const DEFAULT_WIDTH: u32 = 50;

/// Configuration file structure for emoji-mosaic.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub curve: CurveConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub invert: bool,
    #[serde(default = "default_palette")]
    pub palette: String,
    #[serde(default)]
    pub resample: ResampleFilter,
    #[serde(default = "default_cell_aspect")]
    pub cell_aspect: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            invert: false,
            palette: default_palette(),
            resample: ResampleFilter::default(),
            cell_aspect: DEFAULT_CELL_ASPECT_RATIO,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct CurveConfig {
    #[serde(default = "default_curve_height")]
    pub height: f64,
    /// Control points as `[x, y]` pairs
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_CURVE_HEIGHT,
            points: Vec::new(),
        }
    }
}

impl CurveConfig {
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().map(|[x, y]| Point::new(*x, *y)).collect()
    }

    pub fn to_curve(&self) -> Result<Curve, CurveError> {
        Curve::from_points(self.points(), self.height)
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    /// Font used to measure symbol brightness; unset means linear fallback
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default = "default_render_size")]
    pub size: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            font: None,
            size: DEFAULT_RENDER_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_palette() -> String {
    DEFAULT_PALETTE_ID.to_string()
}

fn default_cell_aspect() -> f64 {
    DEFAULT_CELL_ASPECT_RATIO
}

fn default_curve_height() -> f64 {
    DEFAULT_CURVE_HEIGHT
}

fn default_render_size() -> u32 {
    DEFAULT_RENDER_SIZE
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("emoji-mosaic").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/emoji-mosaic/config.toml")
        })
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# emoji-mosaic configuration

[render]
# Output width in cells
width = 50
# Invert brightness
invert = false
# Palette id (see `emoji-mosaic palettes`)
palette = "moon"
# Scaling: area, bilinear, nearest
resample = "area"
# Cell height / width; 2.0 suits ASCII palettes in a terminal
cell_aspect = 1.0

[curve]
# Curve editor height; brightness = 1 - y / height
height = 200.0
# Control points as [x, y]; fewer than two means no adjustment
points = []

[analyzer]
# Font used to measure custom palette brightness
# font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
size = 32

[playback]
fps = 10
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/emoji-mosaic.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.width, DEFAULT_WIDTH);
        assert_eq!(config.render.palette, "moon");
        assert_eq!(config.playback.fps, DEFAULT_FPS);
    }

    #[test]
    fn test_default_config_text_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[render]\nwidth = 80\nresample = \"bilinear\"\n\n[curve]\npoints = [[0.0, 200.0], [150.0, 20.0], [300.0, 0.0]]"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.render.width, 80);
        assert_eq!(config.render.resample, ResampleFilter::Bilinear);
        assert!(!config.render.invert);
        let curve = config.curve.to_curve().unwrap();
        assert_eq!(curve.points().len(), 3);
        assert_eq!(curve.height(), DEFAULT_CURVE_HEIGHT);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nwidth = \"wide\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_curve_height_rejected() {
        let curve = CurveConfig {
            height: 0.0,
            points: vec![[0.0, 0.0], [300.0, 0.0]],
        };
        assert_eq!(curve.to_curve(), Err(CurveError::InvalidHeight(0.0)));
    }

    #[test]
    fn test_empty_curve_is_identity() {
        assert!(CurveConfig::default().to_curve().unwrap().is_identity());
    }
}
