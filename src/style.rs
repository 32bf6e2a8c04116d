//! Fills, shadows and their binding to logical components.
//!
//! Styling is independent of geometry: the compositor decides what gets
//! drawn where, the [`StyleBinding`] decides what it looks like, and each
//! renderer resolves the two on its own. Colors persist as `#RRGGBB` /
//! `#RRGGBBAA` hex strings so exported designs stay readable and
//! locale-proof.

use serde::{Deserialize, Serialize};

use crate::compose::Component;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let parse = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        match hex.len() {
            6 => Some(Color {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: 255,
            }),
            8 => Some(Color {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: parse(6..8)?,
            }),
            _ => None,
        }
    }

    /// Linear interpolation towards `other`, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color {:?}", s))
    }
}

/// How a component is painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    Solid { color: Color },
    /// Two-stop gradient along `angle_degrees` (0 = left to right).
    LinearGradient { start: Color, end: Color, angle_degrees: f64 },
    /// Two-stop gradient from the canvas center outward.
    RadialGradient { center: Color, edge: Color },
    /// An image file stretched over the canvas. Backends that cannot embed
    /// images (and missing files) fall back to the solid color.
    Image { path: String, fallback: Color },
}

impl Fill {
    pub fn solid(color: Color) -> Fill {
        Fill::Solid { color }
    }

    /// The single color backends use where the real fill is unavailable.
    pub fn fallback_color(&self) -> Color {
        match self {
            Fill::Solid { color } => *color,
            Fill::LinearGradient { start, .. } => *start,
            Fill::RadialGradient { center, .. } => *center,
            Fill::Image { fallback, .. } => *fallback,
        }
    }
}

/// A drop shadow in module units, scaled with the code itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

/// Fill plus optional shadow for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStyle {
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl ComponentStyle {
    pub fn solid(color: Color) -> Self {
        ComponentStyle { fill: Fill::solid(color), shadow: None }
    }
}

/// Per-component styling for a whole design, plus the canvas background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleBinding {
    pub background: Fill,
    pub on_pixels: ComponentStyle,
    pub off_pixels: ComponentStyle,
    pub eye_outer: ComponentStyle,
    pub eye_pupil: ComponentStyle,
    pub eye_background: ComponentStyle,
}

impl StyleBinding {
    pub fn for_component(&self, component: Component) -> &ComponentStyle {
        match component {
            Component::OnPixels => &self.on_pixels,
            Component::OffPixels => &self.off_pixels,
            Component::EyeOuter => &self.eye_outer,
            Component::EyePupil => &self.eye_pupil,
            Component::EyeBackground => &self.eye_background,
        }
    }
}

impl Default for StyleBinding {
    /// Black modules on a white canvas, the plain scannable default.
    fn default() -> Self {
        StyleBinding {
            background: Fill::solid(Color::WHITE),
            on_pixels: ComponentStyle::solid(Color::BLACK),
            off_pixels: ComponentStyle::solid(Color::WHITE),
            eye_outer: ComponentStyle::solid(Color::BLACK),
            eye_pupil: ComponentStyle::solid(Color::BLACK),
            eye_background: ComponentStyle::solid(Color::WHITE),
        }
    }
}
