//! Deserializable target-system presets.

use serde::{Deserialize, Serialize};

use crate::color::DistanceMetric;
use crate::dither::DitherKernel;
use crate::palette::{Palette, PaletteError};

/// A named target-system configuration.
///
/// Presets describe a retro display: its resolution, its master palette as
/// hex strings, and the tunables that produce good results on it. Every
/// tunable is optional; the `effective_*` accessors fill in the defaults so
/// preset files only state what they override.
///
/// # Example
///
/// ```
/// use retro_dither::Preset;
///
/// let json = r##"{
///     "id": "gameboy",
///     "name": "Nintendo Game Boy",
///     "width": 160,
///     "height": 144,
///     "palette": ["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"],
///     "diffuse": 0.7
/// }"##;
/// let preset: Preset = serde_json::from_str(json).unwrap();
/// assert_eq!(preset.effective_diffuse(), 0.7);
/// assert_eq!(preset.effective_noise(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Stable machine identifier, e.g. `"c64.multi"`.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Target display width in pixels.
    pub width: usize,
    /// Target display height in pixels.
    pub height: usize,
    /// Master palette as hex color strings.
    pub palette: Vec<String>,

    /// Reduce the master palette to this many colors before dithering.
    /// Absent or zero means use the master palette as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<usize>,
    /// Preference for spread-out versus frequency-faithful reduced colors,
    /// in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity: Option<f32>,
    /// Error diffusion strength, usually `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse: Option<f32>,
    /// Ordered-dither (Bayer) modulation strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<f32>,
    /// Noise level; the amplitude applied is `1 << (noise + 2)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<i32>,
    /// Diffusion kernel name, e.g. `"floyd"` or `"sierralite"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    /// Color distance function name, e.g. `"perceptual"` or `"max"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errfn: Option<String>,
}

impl Preset {
    /// Parse the hex palette strings into a [`Palette`].
    ///
    /// # Errors
    ///
    /// Fails when the list is empty or any entry is not valid hex.
    pub fn parsed_palette(&self) -> Result<Palette, PaletteError> {
        let strs: Vec<&str> = self.palette.iter().map(String::as_str).collect();
        Palette::from_hex(&strs)
    }

    /// Diffusion strength, defaulting to `0.8`.
    pub fn effective_diffuse(&self) -> f32 {
        self.diffuse.unwrap_or(0.8)
    }

    /// Ordered-dither strength, defaulting to off.
    pub fn effective_ordered(&self) -> f32 {
        self.ordered.unwrap_or(0.0)
    }

    /// Noise level, defaulting to off.
    pub fn effective_noise(&self) -> i32 {
        self.noise.unwrap_or(0)
    }

    /// Palette diversity for reduction, defaulting to `0.0`.
    pub fn effective_diversity(&self) -> f32 {
        self.diversity.unwrap_or(0.0)
    }

    /// Resolved diffusion kernel; unknown names fall back to Floyd-Steinberg.
    pub fn effective_kernel(&self) -> DitherKernel {
        self.kernel
            .as_deref()
            .map(DitherKernel::from_name)
            .unwrap_or_default()
    }

    /// Resolved distance metric; unknown names fall back to perceptual.
    pub fn effective_metric(&self) -> DistanceMetric {
        self.errfn
            .as_deref()
            .map(DistanceMetric::from_name)
            .unwrap_or_default()
    }
}
