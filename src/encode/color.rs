//! 24-bit ANSI colors for the console encoder's level column.

use crate::level::Level;
use std::fmt;

/// A dedicated type prevents mixing up raw u8 triples and documents color intent at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB`; malformed input yields `None` so config errors stay visible.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self { r, g, b })
    }

    #[must_use]
    pub fn fg_ansi(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Terminates any active SGR styling.
    pub const RESET: &'static str = "\x1b[0m";

    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    #[must_use]
    pub const fn yellow() -> Self {
        Self::new(241, 250, 140)
    }

    #[must_use]
    pub const fn cyan() -> Self {
        Self::new(139, 233, 253)
    }

    #[must_use]
    pub const fn red() -> Self {
        Self::new(255, 85, 85)
    }

    #[must_use]
    pub const fn purple() -> Self {
        Self::new(189, 147, 249)
    }

    #[must_use]
    pub const fn pink() -> Self {
        Self::new(255, 121, 198)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One color per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; 5],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                Color::purple(),
                Color::cyan(),
                Color::yellow(),
                Color::red(),
                Color::pink(),
            ],
        }
    }
}

impl Palette {
    #[must_use]
    pub const fn get(&self, level: Level) -> Color {
        self.colors[level as usize]
    }

    #[must_use]
    pub const fn set(mut self, level: Level, color: Color) -> Self {
        self.colors[level as usize] = color;
        self
    }

    /// Wraps `text` in the level's color and a reset.
    #[must_use]
    pub fn paint(&self, level: Level, text: &str) -> String {
        format!("{}{text}{}", self.get(level).fg_ansi(), Color::RESET)
    }
}
