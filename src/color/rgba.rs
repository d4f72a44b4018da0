//! Packed 32-bit color type
//!
//! The engine works on colors packed into a single `u32`: red in the lowest
//! byte, then green, then blue, with alpha in the highest byte. All channel
//! arithmetic happens in unpacked `f32` space; this module is the only place
//! the bit layout matters.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// Alpha mask forced onto every color entering the engine.
const OPAQUE: u32 = 0xFF00_0000;

/// A packed RGBA color in the engine's internal layout.
///
/// Bits `[7:0]` are red, `[15:8]` green, `[23:16]` blue, `[31:24]` alpha.
/// Alpha is always fully opaque (`0xFF`) once a color has passed through any
/// constructor; the dithering math never touches it.
///
/// Channel accessors return `f32` because all engine arithmetic (error
/// accumulation, distance metrics, centroid means) is done in float space.
///
/// # Example
///
/// ```
/// use retro_dither::Rgba;
///
/// let c = Rgba::from_channels(255, 128, 0);
/// assert_eq!(c.r(), 255.0);
/// assert_eq!(c.g(), 128.0);
/// assert_eq!(c.b(), 0.0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(u32);

impl Rgba {
    /// Fully opaque black, the reference point for [`intensity`](crate::color::intensity).
    pub const BLACK: Rgba = Rgba(OPAQUE);

    /// Fully opaque white.
    pub const WHITE: Rgba = Rgba(0xFFFF_FFFF);

    /// Create a color from a raw packed value, forcing the alpha byte opaque.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Rgba(packed | OPAQUE)
    }

    /// Create a color from 8-bit channel values.
    #[inline]
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Rgba((r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | OPAQUE)
    }

    /// Pack float channels, clamping each to `0..=255` and truncating.
    ///
    /// Truncation (not rounding) matches the fixed-width arithmetic of the
    /// palette reducer, which depends on it for reproducible convergence.
    #[inline]
    pub fn pack(r: f32, g: f32, b: f32) -> Self {
        let rc = r.clamp(0.0, 255.0) as u32;
        let gc = g.clamp(0.0, 255.0) as u32;
        let bc = b.clamp(0.0, 255.0) as u32;
        Rgba(rc | (gc << 8) | (bc << 16) | OPAQUE)
    }

    /// Red channel as `f32` in `0.0..=255.0`.
    #[inline]
    pub fn r(self) -> f32 {
        (self.0 & 0xFF) as f32
    }

    /// Green channel as `f32` in `0.0..=255.0`.
    #[inline]
    pub fn g(self) -> f32 {
        ((self.0 >> 8) & 0xFF) as f32
    }

    /// Blue channel as `f32` in `0.0..=255.0`.
    #[inline]
    pub fn b(self) -> f32 {
        ((self.0 >> 16) & 0xFF) as f32
    }

    /// The raw packed value (alpha included).
    #[inline]
    pub fn to_packed(self) -> u32 {
        self.0
    }

    /// Channel bytes as `[R, G, B]`, for downstream exporters.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.0 & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            ((self.0 >> 16) & 0xFF) as u8,
        ]
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_bytes();
        write!(f, "Rgba(#{r:02X}{g:02X}{b:02X})")
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Parse a color from a CSS-style hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB` (case-insensitive,
    /// surrounding whitespace trimmed). The parsed color is always opaque.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_dither::Rgba;
    ///
    /// let teal: Rgba = "#008080".parse().unwrap();
    /// assert_eq!(teal.to_bytes(), [0, 128, 128]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        // The slicing below needs single-byte chars.
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_channels(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::from_channels(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
