//! Brightness palettes.
//!
//! A palette is an ordered list of symbols from darkest to brightest. Some
//! palettes also carry directional sub-palettes used where the brightness
//! changes sharply between horizontally adjacent cells (e.g. waxing and
//! waning moon phases), and a pair of neutral symbols for the extremes.
//!
//! Palettes are immutable once built. New palettes are appended to a
//! [`PaletteRegistry`]; existing entries are never edited in place.

mod builtin;
mod registry;

use serde::Serialize;

pub use builtin::{
    builtin_palettes, BLOCKS_SYMBOLS, CIRCLE_SYMBOLS, FACE_SYMBOLS, HEART_SYMBOLS,
    MINIMAL_SYMBOLS, MOON_LEFT_LIT, MOON_RIGHT_LIT, MOON_SYMBOLS, STANDARD_SYMBOLS,
    WEATHER_SYMBOLS,
};
pub use registry::PaletteRegistry;

/// Id of the palette used when none is requested.
pub const DEFAULT_PALETTE_ID: &str = "moon";

/// Errors raised while building or registering palettes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    #[error("palette '{0}' has no symbols")]
    Empty(String),

    #[error("palette '{id}' has an empty {which} sub-palette")]
    EmptyDirectional { id: String, which: &'static str },

    #[error("palette id must not be empty")]
    MissingId,

    #[error("a palette with id '{0}' is already registered")]
    DuplicateId(String),

    #[error("unknown palette '{0}'")]
    NotFound(String),
}

/// Which side of a cell is lit, judged from its right-hand neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The neighbour to the right is brighter.
    RightLit,
    /// The neighbour to the right is darker.
    LeftLit,
}

/// An ordered brightness-to-symbol mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    id: String,
    name: String,
    symbols: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    neutral_symbols: Option<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right_lit_symbols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    left_lit_symbols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Palette {
    /// Start building a palette from its main symbol sequence.
    pub fn builder<I, S>(id: impl Into<String>, name: impl Into<String>, symbols: I) -> PaletteBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PaletteBuilder {
            palette: Palette {
                id: id.into(),
                name: name.into(),
                symbols: symbols.into_iter().map(Into::into).collect(),
                neutral_symbols: None,
                right_lit_symbols: None,
                left_lit_symbols: None,
                description: None,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Main sequence, darkest first.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol for very dark cells. Falls back to the first main symbol.
    pub fn neutral_dark(&self) -> &str {
        match &self.neutral_symbols {
            Some((dark, _)) => dark,
            None => self.symbols.first().map(String::as_str).unwrap_or(" "),
        }
    }

    /// Symbol for very bright cells. Falls back to the last main symbol.
    pub fn neutral_bright(&self) -> &str {
        match &self.neutral_symbols {
            Some((_, bright)) => bright,
            None => self.symbols.last().map(String::as_str).unwrap_or(" "),
        }
    }

    /// Directional sub-palette, if this palette defines one.
    pub fn directional(&self, direction: Direction) -> Option<&[String]> {
        let symbols = match direction {
            Direction::RightLit => self.right_lit_symbols.as_deref(),
            Direction::LeftLit => self.left_lit_symbols.as_deref(),
        };
        symbols.filter(|s| !s.is_empty())
    }

    /// Whether either directional sub-palette is present.
    pub fn has_directional(&self) -> bool {
        self.right_lit_symbols.is_some() || self.left_lit_symbols.is_some()
    }

    /// Symbol at `index` in the main sequence, clamped to the last entry.
    pub fn symbol_at(&self, index: usize) -> &str {
        let last = self.symbols.len().saturating_sub(1);
        self.symbols
            .get(index.min(last))
            .map(String::as_str)
            .unwrap_or(" ")
    }

    fn validate(&self) -> Result<(), PaletteError> {
        if self.id.trim().is_empty() {
            return Err(PaletteError::MissingId);
        }
        if self.symbols.is_empty() {
            return Err(PaletteError::Empty(self.id.clone()));
        }
        if matches!(&self.right_lit_symbols, Some(s) if s.is_empty()) {
            return Err(PaletteError::EmptyDirectional {
                id: self.id.clone(),
                which: "right-lit",
            });
        }
        if matches!(&self.left_lit_symbols, Some(s) if s.is_empty()) {
            return Err(PaletteError::EmptyDirectional {
                id: self.id.clone(),
                which: "left-lit",
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.name, self.symbols.concat())
    }
}

/// Builder for [`Palette`]. Validation happens in [`PaletteBuilder::build`].
#[derive(Debug, Clone)]
pub struct PaletteBuilder {
    palette: Palette,
}

impl PaletteBuilder {
    pub fn neutral(mut self, dark: impl Into<String>, bright: impl Into<String>) -> Self {
        self.palette.neutral_symbols = Some((dark.into(), bright.into()));
        self
    }

    pub fn right_lit<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette.right_lit_symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn left_lit<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette.left_lit_symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.palette.description = Some(description.into());
        self
    }

    pub fn build(self) -> Result<Palette, PaletteError> {
        self.palette.validate()?;
        Ok(self.palette)
    }
}
