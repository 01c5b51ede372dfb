//! Brightness to symbol selection.

use crate::palette::{Direction, Palette};

/// Cells darker than this use the palette's neutral dark symbol.
pub const DARK_THRESHOLD: f64 = 0.15;

/// Cells brighter than this use the palette's neutral bright symbol.
pub const BRIGHT_THRESHOLD: f64 = 0.85;

/// Minimum brightness difference to the right-hand neighbour that counts as
/// an edge.
pub const GRADIENT_THRESHOLD: f64 = 0.2;

/// Index into a sequence of `len` symbols for uniform mapping.
///
/// `clamp(floor(nb * (len - 1)), 0, len - 1)`
#[inline]
pub fn uniform_index(nb: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    clamp_index((nb * last as f64).floor(), last)
}

/// Index into a directional sub-palette of `len` symbols.
///
/// Uses the cell's own brightness against the sub-palette length,
/// `clamp(floor(nb * len), 0, len - 1)`.
#[inline]
pub fn directional_index(nb: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    clamp_index((nb * len as f64).floor(), len - 1)
}

fn clamp_index(raw: f64, last: usize) -> usize {
    // NaN compares false everywhere and lands on 0
    if raw >= last as f64 {
        last
    } else if raw > 0.0 {
        raw as usize
    } else {
        0
    }
}

/// Gradient direction from a cell to its right-hand neighbour, if the
/// difference is large enough to count as an edge.
pub fn gradient_direction(nb: f64, right: Option<f64>) -> Option<Direction> {
    let right = right?;
    if (nb - right).abs() <= GRADIENT_THRESHOLD {
        return None;
    }
    if right > nb {
        Some(Direction::RightLit)
    } else {
        Some(Direction::LeftLit)
    }
}

/// Choose the symbol for one cell.
///
/// `nb` is the cell's normalized brightness and `right` the right-hand
/// neighbour's (`None` in the last column); both already inverted if
/// requested. Priority: neutral extremes, then directional sub-palettes on
/// edges, then uniform mapping over the main sequence.
pub fn select_symbol(palette: &Palette, nb: f64, right: Option<f64>) -> &str {
    if nb < DARK_THRESHOLD {
        return palette.neutral_dark();
    }
    if nb > BRIGHT_THRESHOLD {
        return palette.neutral_bright();
    }

    if let Some(direction) = gradient_direction(nb, right) {
        if let Some(symbols) = palette.directional(direction) {
            return &symbols[directional_index(nb, symbols.len())];
        }
    }

    palette.symbol_at(uniform_index(nb, palette.len()))
}
