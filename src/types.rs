//! Core types for canvas-widgets.
//!
//! These types define the foundation that everything builds on.
//! They flow through the property setters and define what the renderer understands.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::Error;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
///
/// Serializes as a CSS-style hex string (`"#rrggbb"`, or `"#rrggbbaa"` when
/// not fully opaque), which is the shape property dumps use on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Mix each channel toward white by `amount` (0.0 = unchanged, 1.0 = white).
    pub fn lighten(&self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// Mix each channel toward black by `amount` (0.0 = unchanged, 1.0 = black).
    pub fn darken(&self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 * (1.0 - amount)).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// Format as a hex string: `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` hex literals.
    fn from_str(s: &str) -> Result<Self, Error> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        if !hex.is_ascii() {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let parse =
            |h: &str| u8::from_str_radix(h, 16).map_err(|_| Error::InvalidColor(s.to_string()));
        match hex.len() {
            3 => {
                // Shorthand: each digit doubled
                let d = |i: usize| parse(&hex[i..i + 1]).map(|v| v * 16 + v);
                Ok(Self::rgb(d(0)?, d(1)?, d(2)?))
            }
            6 => Ok(Self::rgb(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
                parse(&hex[6..8])?,
            )),
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// Text Alignment
// =============================================================================

/// Horizontal text alignment within a widget's interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

// =============================================================================
// Text Style (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Style flags applied to canvas text ops.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextStyle: u8 {
        const BOLD      = 0b0000_0001;
        const ITALIC    = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
    }
}

// =============================================================================
// Widget Kind
// =============================================================================

/// Discriminator identifying the concrete widget kind.
///
/// This is the `type` tag in serialized property dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Button,
    TextInput,
    Label,
}

impl WidgetKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::TextInput => "textinput",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Check whether a point falls inside the rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Shrink the rectangle by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgba::rgb(0x1a, 0x2b, 0x3c);
        assert_eq!(c.to_hex(), "#1a2b3c");
        assert_eq!("#1a2b3c".parse::<Rgba>().unwrap(), c);

        let translucent = Rgba::new(10, 20, 30, 128);
        assert_eq!(translucent.to_hex(), "#0a141e80");
        assert_eq!("#0a141e80".parse::<Rgba>().unwrap(), translucent);
    }

    #[test]
    fn test_hex_shorthand() {
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("#f00".parse::<Rgba>().unwrap(), Rgba::RED);
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!("red".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#zzzzzz".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_lighten_darken() {
        assert_eq!(Rgba::BLACK.lighten(1.0), Rgba::WHITE);
        assert_eq!(Rgba::WHITE.darken(1.0), Rgba::BLACK);

        let c = Rgba::rgb(100, 100, 100);
        assert_eq!(c.lighten(0.0), c);
        assert_eq!(c.darken(0.0), c);
        // Alpha untouched
        let t = Rgba::new(100, 100, 100, 40);
        assert_eq!(t.lighten(0.5).a, 40);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let c = Rgba::rgb(255, 0, 0);
        assert_eq!(serde_json::to_value(c).unwrap(), serde_json::json!("#ff0000"));
        let back: Rgba = serde_json::from_value(serde_json::json!("#ff0000")).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_text_align_serde() {
        assert_eq!(
            serde_json::to_value(TextAlign::Center).unwrap(),
            serde_json::json!("center")
        );
        let align: TextAlign = serde_json::from_value(serde_json::json!("right")).unwrap();
        assert_eq!(align, TextAlign::Right);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 100.0, 30.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(50.0, 25.0));
        assert!(!r.contains(110.0, 25.0));
        assert!(!r.contains(50.0, 40.0));
        assert!(!r.contains(9.9, 10.0));
    }

    #[test]
    fn test_rect_inset() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset(2.0);
        assert_eq!(r, Rect::new(2.0, 2.0, 6.0, 6.0));
        // Over-inset clamps to zero size
        let tiny = Rect::new(0.0, 0.0, 2.0, 2.0).inset(5.0);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.height, 0.0);
    }
}
