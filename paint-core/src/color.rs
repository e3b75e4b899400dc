//! RGBA colors with hex-string parsing.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a `#RRGGBB` or `#RRGGBBAA` hex string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColor`] if the string is not a well-formed
    /// hex color.
    pub fn from_hex(s: &str) -> CoreResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| CoreError::InvalidColor(format!("missing '#' prefix: {s}")))?;
        if hex.len() != 6 && hex.len() != 8 || !hex.is_ascii() {
            return Err(CoreError::InvalidColor(format!(
                "expected 6 or 8 hex digits: {s}"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CoreError::InvalidColor(format!("bad hex digits: {s}")))
        };
        let r = channel(0)?;
        let g = channel(2)?;
        let b = channel(4)?;
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(r, g, b, a))
    }

    /// Format as a `#RRGGBBAA` hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[must_use]
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
