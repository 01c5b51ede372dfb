//! Built-in palettes.

use super::Palette;

/// Lunar phases from new moon to full moon and back.
pub const MOON_SYMBOLS: &[&str] = &["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"];

/// Waxing phases: light on the right, dark on the left.
pub const MOON_RIGHT_LIT: &[&str] = &["🌒", "🌓", "🌔"];

/// Waning phases: light on the left, dark on the right.
pub const MOON_LEFT_LIT: &[&str] = &["🌘", "🌗", "🌖"];

pub const WEATHER_SYMBOLS: &[&str] = &["⚫", "🌧️", "⛅", "🌤️", "☀️"];

pub const HEART_SYMBOLS: &[&str] = &["🖤", "❤️", "💗", "💕", "💖", "💝"];

pub const FACE_SYMBOLS: &[&str] = &["😶", "🙁", "😐", "🙂", "😊", "😄"];

pub const CIRCLE_SYMBOLS: &[&str] = &["⚫", "🔵", "🟣", "🟡", "⚪"];

/// Standard ASCII density ramp (10 levels).
/// Works well on dark terminals.
pub const STANDARD_SYMBOLS: &[&str] = &[" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

/// Unicode block shades (5 levels).
pub const BLOCKS_SYMBOLS: &[&str] = &[" ", "░", "▒", "▓", "█"];

/// Minimal ramp (4 levels) for a clean look.
pub const MINIMAL_SYMBOLS: &[&str] = &[" ", ".", ":", "#"];

fn owned(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

fn simple(id: &str, name: &str, symbols: &[&str], description: &str) -> Palette {
    Palette {
        id: id.to_string(),
        name: name.to_string(),
        symbols: owned(symbols),
        neutral_symbols: Some((
            symbols[0].to_string(),
            symbols[symbols.len() - 1].to_string(),
        )),
        right_lit_symbols: None,
        left_lit_symbols: None,
        description: Some(description.to_string()),
    }
}

/// The moon palette: the only built-in with directional sub-palettes.
fn moon() -> Palette {
    Palette {
        id: "moon".to_string(),
        name: "Moon Phases".to_string(),
        symbols: owned(MOON_SYMBOLS),
        neutral_symbols: Some(("🌑".to_string(), "🌕".to_string())),
        right_lit_symbols: Some(owned(MOON_RIGHT_LIT)),
        left_lit_symbols: Some(owned(MOON_LEFT_LIT)),
        description: Some("Lunar cycle from new moon to full moon".to_string()),
    }
}

/// All built-in palettes, moon first.
pub fn builtin_palettes() -> Vec<Palette> {
    vec![
        moon(),
        simple("weather", "Weather", WEATHER_SYMBOLS, "Weather from darkness to brightness"),
        simple("hearts", "Hearts", HEART_SYMBOLS, "Hearts from dark to bright"),
        simple("faces", "Faces", FACE_SYMBOLS, "Faces from neutral to happy"),
        simple("circles", "Circles", CIRCLE_SYMBOLS, "Circles from dark to bright"),
        simple("standard", "Standard ASCII", STANDARD_SYMBOLS, "10-level ASCII density ramp"),
        simple("blocks", "Blocks", BLOCKS_SYMBOLS, "Unicode block shades"),
        simple("minimal", "Minimal", MINIMAL_SYMBOLS, "4-level ASCII ramp"),
    ]
}
