//! Diverging colormap for correlation charts
//!
//! Coefficients live in [-1, 1], so charts use the coolwarm map centred
//! on zero: blue for negative, grey for none, red for positive.

use serde::{Deserialize, Serialize};

/// A color in RGB format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to 8-bit channels
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
        }
    }
}

/// Evenly spaced color stops sampled by linear interpolation
#[derive(Clone, Debug)]
pub struct Colormap {
    pub name: String,
    colors: Vec<Color>,
}

impl Colormap {
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, t: f32) -> Color {
        match self.colors.len() {
            0 => Color::rgb(0.5, 0.5, 0.5),
            1 => self.colors[0],
            n => {
                let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
                let i = (scaled.floor() as usize).min(n - 2);
                Color::lerp(&self.colors[i], &self.colors[i + 1], scaled - i as f32)
            }
        }
    }

    /// Sample at a correlation coefficient, mapping [-1, 1] onto [0, 1]
    pub fn sample_coefficient(&self, r: f64) -> Color {
        self.sample(((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32)
    }
}

/// Get the coolwarm diverging colormap
pub fn coolwarm() -> Colormap {
    Colormap::from_colors(
        "coolwarm",
        vec![
            Color::rgb(0.230, 0.299, 0.754),
            Color::rgb(0.552, 0.691, 0.996),
            Color::rgb(0.865, 0.865, 0.865),
            Color::rgb(0.957, 0.647, 0.510),
            Color::rgb(0.706, 0.016, 0.150),
        ],
    )
}

/// Whether an annotation over a cell of value `r` should be drawn in white
pub fn needs_light_text(r: f64) -> bool {
    r.abs() > 0.5
}
