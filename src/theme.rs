//! Theme loading: `theme[key]="value"` files and hex → ratatui Color.

use crate::Palette;
use crate::game::BLOCK_COLORS;
use crate::keyfile;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Block palette and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Piece colours, indexed by `Piece::color`.
    pub blocks: [Color; BLOCK_COLORS as usize],
    /// Background behind board, tray and sidebar.
    pub bg: Color,
    /// Empty board cell.
    pub empty: Color,
    /// Borders.
    pub div_line: Color,
    /// Text (score, best, combo).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text, key hints.
    pub inactive_fg: Color,
    /// Shadow of a candidate that cannot be dropped.
    pub invalid: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Hex literal known to be well-formed.
fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    /// Dark terminal background with the bright block colours.
    pub fn dark() -> Self {
        Self {
            blocks: [
                rgb(0xFF_3366), // pink
                rgb(0x00_C853), // green
                rgb(0x29_79FF), // blue
                rgb(0xFF_D600), // yellow
                rgb(0xAA_00FF), // purple
                rgb(0xFF_6D00), // orange
            ],
            bg: rgb(0x28_2C34),
            empty: rgb(0x3F_444F),
            div_line: rgb(0x5C_6370),
            main_fg: rgb(0xAB_B2BF),
            title: rgb(0xE5_C07B),
            inactive_fg: rgb(0x5C_6370),
            invalid: rgb(0xE0_6C75),
        }
    }

    /// White board, light grey empty cells.
    pub fn light() -> Self {
        Self {
            bg: rgb(0xFF_FFFF),
            empty: rgb(0xF0_F0F0),
            div_line: rgb(0xE0_E0E0),
            main_fg: rgb(0x33_3333),
            title: rgb(0x29_79FF),
            inactive_fg: rgb(0x99_9999),
            invalid: rgb(0xFF_8A80),
            ..Self::dark()
        }
    }

    /// Load theme from a file of `theme[key]="#RRGGBB"` lines over the palette's defaults.
    /// Without a path (or when the file does not exist) the palette's defaults are returned.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = Self::for_palette(palette);
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(theme),
        };
        let s = std::fs::read_to_string(path)?;
        let map: HashMap<String, String> = keyfile::parse_entries("theme", &s).into_iter().collect();
        theme.apply_map(&map)?;
        Ok(theme)
    }

    /// Built-in theme for a palette.
    pub fn for_palette(palette: Palette) -> Self {
        match palette {
            Palette::Normal => Self::dark(),
            Palette::Light => Self::light(),
            Palette::HighContrast => Self {
                blocks: [
                    rgb(0xFF_0000), // red
                    rgb(0x00_FF00), // green
                    rgb(0x00_88FF), // blue
                    rgb(0xFF_FF00), // yellow
                    rgb(0xFF_00FF), // magenta
                    rgb(0x00_FFFF), // cyan
                ],
                bg: Color::Black,
                empty: rgb(0x30_3030),
                main_fg: Color::White,
                ..Self::dark()
            },
            // Avoid red/green pairs; blue/orange carry most of the contrast.
            Palette::Colorblind => Self {
                blocks: [
                    rgb(0x00_77BB), // blue
                    rgb(0xEE_7733), // orange
                    rgb(0x00_9988), // teal
                    rgb(0xCC_3311), // red
                    rgb(0xEE_3377), // magenta
                    rgb(0xBB_BB00), // yellow
                ],
                ..Self::dark()
            },
        }
    }

    /// Override colours from a key → hex map. Keys: `block1`..`block6`, `bg`, `empty`,
    /// `div_line`, `main_fg`, `title`, `inactive_fg`, `invalid`.
    fn apply_map(&mut self, map: &HashMap<String, String>) -> Result<(), ThemeError> {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            if let Some(v) = map.get(&format!("block{}", i + 1)) {
                *block = parse_hex(v)?;
            }
        }
        let slots: [(&str, &mut Color); 7] = [
            ("bg", &mut self.bg),
            ("empty", &mut self.empty),
            ("div_line", &mut self.div_line),
            ("main_fg", &mut self.main_fg),
            ("title", &mut self.title),
            ("inactive_fg", &mut self.inactive_fg),
            ("invalid", &mut self.invalid),
        ];
        for (key, slot) in slots {
            if let Some(v) = map.get(key) {
                *slot = parse_hex(v)?;
            }
        }
        Ok(())
    }

    /// Colour for a piece colour index.
    #[inline]
    pub fn block_color(&self, index: u8) -> Color {
        self.blocks[index as usize % self.blocks.len()]
    }
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>, scale: u8| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| v * scale)
            .map_err(|_| invalid())
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?)),
        3 => Ok(Color::Rgb(
            channel(0..1, 17)?,
            channel(1..2, 17)?,
            channel(2..3, 17)?,
        )),
        _ => Err(invalid()),
    }
}
