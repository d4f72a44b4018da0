//! Palette type with nearest-color matching.

use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{closest_index, intensity, DistanceMetric, Rgba};

/// An ordered, non-empty sequence of palette colors.
///
/// Order matters only for presentation (reduced palettes are sorted by
/// intensity); selection is always by index and otherwise order-independent.
/// Duplicate colors are allowed: retro master palettes (e.g. the NES's 64
/// entries) repeat colors, and the reducer's claim-marking handles them by
/// value.
///
/// Every color in a `Palette` is fully opaque; [`Rgba`] enforces that at
/// construction, so no separate normalization pass is needed here.
///
/// # Example
///
/// ```
/// use retro_dither::Palette;
///
/// let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette from packed colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Empty`] if `colors` is empty.
    pub fn new(colors: &[Rgba]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette from hex color strings.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] for an invalid hex string, or
    /// [`PaletteError::Empty`] for an empty slice.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_dither::Palette;
    ///
    /// let gameboy = Palette::from_hex(&["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"]).unwrap();
    /// assert_eq!(gameboy.len(), 4);
    /// ```
    pub fn from_hex(hex: &[&str]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| Rgba::from_str(s))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color at `idx`.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgba {
        self.colors[idx]
    }

    /// All colors as a slice.
    #[inline]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Index of the entry closest to `color` under `metric`.
    ///
    /// Ties break toward the lowest index.
    #[inline]
    pub fn find_nearest(&self, color: Rgba, metric: DistanceMetric) -> usize {
        closest_index(color, &self.colors, None, metric)
    }

    /// Like [`find_nearest`](Self::find_nearest), restricted to the
    /// `allowed` index subset. Out-of-range entries are skipped.
    #[inline]
    pub fn find_nearest_among(
        &self,
        color: Rgba,
        allowed: &[usize],
        metric: DistanceMetric,
    ) -> usize {
        closest_index(color, &self.colors, Some(allowed), metric)
    }

    /// Consume the palette and return it sorted by ascending intensity.
    ///
    /// Cosmetic only; dithering results do not depend on palette order
    /// beyond index assignment.
    pub fn sorted_by_intensity(mut self) -> Self {
        self.colors
            .sort_by(|a, b| intensity(*a).total_cmp(&intensity(*b)));
        self
    }
}
