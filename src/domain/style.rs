//! Presentation attributes attached to a plotted series

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// An opaque sRGB colour, written as `#rrggbb` or as one of a few plain names in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(0x1f, 0x77, 0xb4);
    pub const RED: Rgb = Rgb(0xd6, 0x27, 0x28);
    pub const GREEN: Rgb = Rgb(0x2c, 0xa0, 0x2c);
    pub const ORANGE: Rgb = Rgb(0xff, 0x7f, 0x0e);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "blue" => return Ok(Rgb::BLUE),
            "r" | "red" => return Ok(Rgb::RED),
            "g" | "green" => return Ok(Rgb::GREEN),
            "orange" => return Ok(Rgb::ORANGE),
            "k" | "black" => return Ok(Rgb::BLACK),
            _ => {}
        }
        let hex = s
            .trim()
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("unknown colour '{s}', expected #rrggbb or a colour name"))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad colour '{s}': {e}"))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    #[default]
    Circle,
    /// Diagonal cross, `x`
    Cross,
    Triangle,
    /// Five-pointed star, `*`
    Star,
    /// Upright cross, `+`
    Plus,
}

/// How one series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub marker: Marker,
    pub line_width: u32,
    /// Opacity of the raw points when a trend curve is drawn over them
    pub alpha: f64,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLUE,
            marker: Marker::Circle,
            line_width: 2,
            alpha: 0.4,
        }
    }
}
