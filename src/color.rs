//! Color values for containers, text layers, and palettes.
//!
//! A [`Color`] is either the `transparent` sentinel or an opaque sRGB value.
//! It serializes as the string form used throughout project records
//! (`"transparent"` or `"#rrggbb"`), so snapshots round-trip through JSON
//! without a separate wire type.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error produced when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected \"transparent\" or \"#rrggbb\"")]
pub struct ColorParseError(pub String);

/// A color value: the `transparent` sentinel or an opaque sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// No fill at all (container backgrounds only).
    #[default]
    Transparent,
    /// An opaque sRGB color.
    Rgb(u8, u8, u8),
}

impl Color {
    pub const WHITE: Self = Self::Rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::Rgb(0x00, 0x00, 0x00);

    /// Returns true for the transparent sentinel.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Returns the RGB components, treating transparent as black.
    pub fn components(&self) -> (u8, u8, u8) {
        match *self {
            Self::Transparent => (0, 0, 0),
            Self::Rgb(r, g, b) => (r, g, b),
        }
    }

    /// Converts to an RGBA pixel; transparent maps to zero alpha.
    pub fn to_rgba(&self) -> image::Rgba<u8> {
        match *self {
            Self::Transparent => image::Rgba([0, 0, 0, 0]),
            Self::Rgb(r, g, b) => image::Rgba([r, g, b, 255]),
        }
    }

    /// Converts an opaque color to a palette sRGB value (transparent → black).
    pub fn to_srgb(&self) -> Srgb<u8> {
        let (r, g, b) = self.components();
        Srgb::new(r, g, b)
    }

    /// Formats as `#rrggbb`, or `transparent` for the sentinel.
    pub fn hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Transparent => f.write_str("transparent"),
            Self::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        let srgb: Srgb<u8> = trimmed
            .parse()
            .map_err(|_| ColorParseError(s.to_string()))?;
        Ok(Self::Rgb(srgb.red, srgb.green, srgb.blue))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::Rgb(255, 128, 0));
        assert_eq!("ff8000".parse::<Color>().unwrap(), Color::Rgb(255, 128, 0));
    }

    #[test]
    fn parses_transparent_sentinel() {
        assert_eq!("transparent".parse::<Color>().unwrap(), Color::Transparent);
        assert_eq!("Transparent".parse::<Color>().unwrap(), Color::Transparent);
    }

    #[test]
    fn rejects_garbage() {
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        let c: Color = "#a8d5e2".parse().unwrap();
        assert_eq!(c.to_string(), "#a8d5e2");
        assert_eq!(Color::Transparent.to_string(), "transparent");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Color::Rgb(0x1c, 0x1c, 0x1c)).unwrap();
        assert_eq!(json, "\"#1c1c1c\"");
        let back: Color = serde_json::from_str("\"transparent\"").unwrap();
        assert_eq!(back, Color::Transparent);
    }
}
