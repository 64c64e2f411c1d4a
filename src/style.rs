//! Colors, styles, masks and positions
//!
//! The enumerations here carry their payload inline: a custom style owns its
//! two colors, a custom mask owns its fill color, a custom position owns its
//! offset.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// RGBA color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Same color with alpha multiplied by `factor`
    pub fn fade(self, factor: f64) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    /// Parse a color from string
    /// Supports: hex (#rrggbb, #rrggbbaa), named colors (black, white, clear)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 && hex.len() != 8 {
                return None;
            }
            let channel = |i: usize| -> Option<f64> {
                let byte = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
                Some(byte as f64 / 255.0)
            };
            let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
            return Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a));
        }

        Some(match s.to_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "clear" | "transparent" => Self::TRANSPARENT,
            _ => return None,
        })
    }

    /// Format as #rrggbbaa
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            byte(self.r),
            byte(self.g),
            byte(self.b),
            byte(self.a)
        )
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("invalid color: {}", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Foreground/background pairing of the HUD box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HudStyle {
    /// Dark content on a white box
    #[default]
    Light,
    /// Light content on a black box
    Dark,
    Custom { foreground: Color, background: Color },
}

impl HudStyle {
    pub fn foreground(&self) -> Color {
        match self {
            HudStyle::Light => Color::BLACK,
            HudStyle::Dark => Color::WHITE,
            HudStyle::Custom { foreground, .. } => *foreground,
        }
    }

    pub fn background(&self) -> Color {
        match self {
            HudStyle::Light => Color::WHITE,
            HudStyle::Dark => Color::BLACK,
            HudStyle::Custom { background, .. } => *background,
        }
    }
}

/// Full-surface backdrop drawn behind the HUD box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskType {
    /// No backdrop; clicks pass through to the content beneath
    #[default]
    None,
    /// Invisible backdrop that still captures clicks
    Clear,
    /// Solid translucent black
    Black,
    /// Radial gradient from transparent center to translucent edge
    Gradient,
    /// Solid fill with the given color
    Custom(Color),
}

impl MaskType {
    /// Translucent black used by the solid mask and the gradient edge
    pub const DIM: Color = Color::rgba(0.0, 0.0, 0.0, 0.5);

    /// Whether the mask blocks interaction with the content beneath
    pub fn captures_clicks(&self) -> bool {
        !matches!(self, MaskType::None)
    }
}

/// Vertical bias of the HUD box within its host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Shifted up by a fifth of the host height
    Top,
    #[default]
    Center,
    /// Shifted down by a fifth of the host height
    Bottom,
    /// Centered, then moved by the given offset
    Custom(Point),
}

impl Position {
    /// Offset from the host center for a host of the given height
    pub fn offset(&self, host_height: f64) -> Point {
        match self {
            Position::Top => Point::new(0.0, -host_height / 5.0),
            Position::Center => Point::ZERO,
            Position::Bottom => Point::new(0.0, host_height / 5.0),
            Position::Custom(offset) => *offset,
        }
    }
}

/// Font description handed to the host for text measurement and drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "system".to_string(),
            size: 16.0,
        }
    }
}
