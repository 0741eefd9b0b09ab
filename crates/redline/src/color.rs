//! Theme color values: `#rrggbb`, `#rgb`, ANSI names or def references

use ratatui::style::Color;
use std::collections::HashMap;

/// Terminal palette names accepted in config. Lookups ignore case, `-` and `_`.
const ANSI_NAMES: &[(&str, Color)] = &[
    ("default", Color::Reset),
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("grey", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("darkgrey", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
    ("white", Color::White),
];

/// Parse `#rrggbb` or `#rgb` (leading `#` optional)
pub fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let packed = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(Color::Rgb(
            (packed >> 16) as u8,
            (packed >> 8 & 0xff) as u8,
            (packed & 0xff) as u8,
        )),
        3 => {
            let expand = |nibble: u32| (nibble * 0x11) as u8;
            Some(Color::Rgb(
                expand(packed >> 8),
                expand(packed >> 4 & 0xf),
                expand(packed & 0xf),
            ))
        }
        _ => None,
    }
}

pub fn ansi_color(name: &str) -> Option<Color> {
    let key: String = name
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    ANSI_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, color)| *color)
}

/// Resolve a theme value. A def name wins over a palette name.
pub fn resolve_color(value: &str, defs: &HashMap<String, String>) -> Option<Color> {
    let value = value.trim();
    if let Some(def) = defs.get(value) {
        return parse_hex(def).or_else(|| ansi_color(def));
    }
    if value.starts_with('#') {
        return parse_hex(value);
    }
    ansi_color(value)
}

/// Darker variant used for gutter rules next to added/removed lines
pub fn dim_color(color: Color) -> Color {
    const FACTOR: f32 = 0.55;
    match color {
        Color::Rgb(r, g, b) => {
            let dim = |channel: u8| (channel as f32 * FACTOR).round() as u8;
            Color::Rgb(dim(r), dim(g), dim(b))
        }
        Color::Reset | Color::Black | Color::DarkGray => color,
        Color::Indexed(_) => color,
        _ => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex("#2ecc71"), Some(Color::Rgb(46, 204, 113)));
        assert_eq!(parse_hex("e74c3c"), Some(Color::Rgb(231, 76, 60)));
        assert_eq!(parse_hex("#fa0"), Some(Color::Rgb(255, 170, 0)));
        assert_eq!(parse_hex("#gggggg"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("+12345"), None);
    }

    #[test]
    fn test_ansi_names_normalized() {
        assert_eq!(ansi_color("Dark-Gray"), Some(Color::DarkGray));
        assert_eq!(ansi_color("light_cyan"), Some(Color::LightCyan));
        assert_eq!(ansi_color("chartreuse"), None);
    }

    #[test]
    fn test_resolve_color_sources() {
        let mut defs = HashMap::new();
        defs.insert("added".to_string(), "#A3BE8C".to_string());
        defs.insert("muted".to_string(), "dark_gray".to_string());
        defs.insert("red".to_string(), "#ff0000".to_string());

        assert_eq!(resolve_color("added", &defs), Some(Color::Rgb(163, 190, 140)));
        assert_eq!(resolve_color("muted", &defs), Some(Color::DarkGray));
        assert_eq!(resolve_color("red", &defs), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(resolve_color(" #000000 ", &defs), Some(Color::Rgb(0, 0, 0)));
        assert_eq!(resolve_color("nope", &defs), None);
    }

    #[test]
    fn test_dim_color() {
        assert_eq!(dim_color(Color::Rgb(200, 100, 0)), Color::Rgb(110, 55, 0));
        assert_eq!(dim_color(Color::Green), Color::DarkGray);
        assert_eq!(dim_color(Color::Reset), Color::Reset);
    }
}
