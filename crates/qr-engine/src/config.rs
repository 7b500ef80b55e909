//! User-editable render configuration.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Output sizes offered by the designer, in pixels per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QrSize {
    Small,
    Medium,
    Large,
}

impl QrSize {
    pub fn pixels(self) -> u32 {
        match self {
            QrSize::Small => 200,
            QrSize::Medium => 300,
            QrSize::Large => 400,
        }
    }
}

impl From<QrSize> for u32 {
    fn from(size: QrSize) -> u32 {
        size.pixels()
    }
}

impl TryFrom<u32> for QrSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            200 => Ok(QrSize::Small),
            300 => Ok(QrSize::Medium),
            400 => Ok(QrSize::Large),
            other => Err(format!("unsupported size {other}: expected 200, 300 or 400")),
        }
    }
}

/// Module (dot) shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    Rounded,
    Dots,
    Classy,
    ClassyRounded,
    Square,
    ExtraRounded,
}

/// Finder-pattern ring shape. Derived from the dot style, never chosen directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerStyle {
    Square,
    ExtraRounded,
}

impl DotStyle {
    /// Corner squares follow the body: square dots get square corners,
    /// every other style gets extra-rounded corners.
    pub fn corner_square_style(self) -> CornerStyle {
        match self {
            DotStyle::Square => CornerStyle::Square,
            _ => CornerStyle::ExtraRounded,
        }
    }
}

/// The full editable configuration for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub content: String,
    pub size: QrSize,
    pub dot_color: String,
    pub dot_style: DotStyle,
    pub logo: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            content: String::new(),
            size: QrSize::Medium,
            dot_color: "#6366f1".into(),
            dot_style: DotStyle::ExtraRounded,
            logo: None,
        }
    }
}

/// Parse a `#rrggbb` hex color into an opaque RGBA pixel.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, EngineError> {
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| EngineError::InvalidColor(value.to_string()))?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EngineError::InvalidColor(value.to_string()));
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok(Rgba([r, g, b, 255])),
        _ => Err(EngineError::InvalidColor(value.to_string())),
    }
}
