//! Theme - colors for the view and for each outcome category.
//!
//! Colors are written in configuration as strings:
//!
//! - `"default"` - terminal's default color
//! - `"blue"`, `"dark_grey"`, ... - named ANSI colors
//! - `"208"` - ANSI palette index (0-255)
//! - `"#ff8800"` / `"#f80"` - RGB hex

use std::fmt;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::shell::Category;

// =============================================================================
// ThemeColor
// =============================================================================

/// A color as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ThemeColor {
    /// Use terminal's default color.
    #[default]
    Default,
    /// Named ANSI color.
    Named(Color),
    /// ANSI palette index (0-255).
    Ansi(u8),
    /// Explicit RGB color.
    Rgb(u8, u8, u8),
}

impl ThemeColor {
    /// Resolve to a crossterm color.
    pub fn resolve(&self) -> Color {
        match *self {
            Self::Default => Color::Reset,
            Self::Named(c) => c,
            Self::Ansi(i) => Color::AnsiValue(i),
            Self::Rgb(r, g, b) => Color::Rgb { r, g, b },
        }
    }

    /// Parse a color string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Some(Self::Default);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Ok(index) = s.parse::<u8>() {
            return Some(Self::Ansi(index));
        }
        named_color(&s.to_ascii_lowercase()).map(Self::Named)
    }
}

fn parse_hex(hex: &str) -> Option<ThemeColor> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(ThemeColor::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(ThemeColor::Rgb(it.next()??, it.next()??, it.next()??))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        _ => return None,
    };
    Some(color)
}

fn color_name(color: Color) -> Option<&'static str> {
    let name = match color {
        Color::Black => "black",
        Color::Red => "red",
        Color::DarkRed => "dark_red",
        Color::Green => "green",
        Color::DarkGreen => "dark_green",
        Color::Yellow => "yellow",
        Color::DarkYellow => "dark_yellow",
        Color::Blue => "blue",
        Color::DarkBlue => "dark_blue",
        Color::Magenta => "magenta",
        Color::DarkMagenta => "dark_magenta",
        Color::Cyan => "cyan",
        Color::DarkCyan => "dark_cyan",
        Color::White => "white",
        Color::Grey => "grey",
        Color::DarkGrey => "dark_grey",
        _ => return None,
    };
    Some(name)
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Default => write!(f, "default"),
            Self::Named(c) => write!(f, "{}", color_name(c).unwrap_or("default")),
            Self::Ansi(i) => write!(f, "{i}"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unrecognized color '{value}'"))
    }
}

impl From<ThemeColor> for String {
    fn from(color: ThemeColor) -> Self {
        color.to_string()
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Colors used by the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub title: ThemeColor,
    pub hint: ThemeColor,
    pub affirmative: ThemeColor,
    pub error: ThemeColor,
    pub informational: ThemeColor,
    pub neutral: ThemeColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: ThemeColor::Named(Color::Blue),
            hint: ThemeColor::Named(Color::DarkGrey),
            affirmative: ThemeColor::Named(Color::Green),
            error: ThemeColor::Named(Color::Red),
            informational: ThemeColor::Named(Color::Yellow),
            neutral: ThemeColor::Named(Color::White),
        }
    }
}

impl Theme {
    /// Color for an outcome category.
    pub fn category(&self, category: Category) -> Color {
        match category {
            Category::Affirmative => self.affirmative.resolve(),
            Category::Error => self.error.resolve(),
            Category::Informational => self.informational.resolve(),
            Category::Neutral => self.neutral.resolve(),
        }
    }
}
