use ratatui::style::Color;

use crate::model::UiConfig;

/// Colors used by the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    /// Cursor row and focused borders
    pub highlight: Color,
    /// Background of the cursor row
    pub selection_bg: Color,
    /// Submit button in Add-Mode
    pub add_button: Color,
    /// Submit button and target row in Edit-Mode
    pub edit_button: Color,
    pub warning: Color,
    pub match_bg: Color,
    pub match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1A, 0x1A, 0x1A),
            text: Color::Rgb(0xD0, 0xD0, 0xD0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x80, 0x80, 0x80),
            highlight: Color::Rgb(0xF4, 0xA2, 0x61),
            selection_bg: Color::Rgb(0x33, 0x33, 0x33),
            add_button: Color::Rgb(0x33, 0x33, 0x33),
            edit_button: Color::Rgb(0x22, 0x8B, 0x22),
            warning: Color::Rgb(0xFF, 0x55, 0x55),
            match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            match_fg: Color::Rgb(0x1A, 0x1A, 0x1A),
        }
    }
}

/// Parse "#RRGGBB"
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied. Unknown slots and
    /// malformed values are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(slot = %key, value = %value, "ignoring malformed color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "dim" => theme.dim = color,
                "highlight" => theme.highlight = color,
                "selection_bg" => theme.selection_bg = color,
                "add_button" => theme.add_button = color,
                "edit_button" => theme.edit_button = color,
                "warning" => theme.warning = color,
                "match_bg" => theme.match_bg = color,
                "match_fg" => theme.match_fg = color,
                _ => tracing::warn!(slot = %key, "unknown color slot"),
            }
        }
        theme
    }
}
