//! Dithering configuration.

use crate::color::DistanceMetric;

use super::kernel::DitherKernel;

/// Configuration for one dithering run.
///
/// Set once per run by the orchestrator from a preset; the canvas copies the
/// values in and then mutates its own working copies during annealing
/// (diffusion cooldown, threshold growth, noise decay). The options value
/// itself is never touched after the run starts.
///
/// # Example
///
/// ```
/// use retro_dither::{DitherKernel, DitherOptions, DistanceMetric};
///
/// let options = DitherOptions::new()
///     .diffuse(0.5)
///     .kernel(DitherKernel::Atkinson)
///     .metric(DistanceMetric::Absolute);
/// ```
#[derive(Debug, Clone)]
pub struct DitherOptions {
    /// Error diffusion strength in `0.0..=1.0`.
    ///
    /// Scales every kernel weight; the annealing loop later shrinks the
    /// working value toward half of this initial strength. Default `0.8`.
    pub diffuse: f32,

    /// Ordered-dither strength in `0.0..=1.0`.
    ///
    /// Modulates each pixel through the 8x8 Bayer threshold matrix before
    /// quantization. `0.0` disables the modulation entirely. Default `0.0`.
    pub ordered: f32,

    /// Initial noise amplitude added per channel, halved after every pass.
    ///
    /// Breaks ties between near-equidistant palette colors in early passes.
    /// Default `0` (no noise, fully deterministic run).
    pub noise: i32,

    /// Diffusion kernel. Default Floyd-Steinberg.
    pub kernel: DitherKernel,

    /// Distance metric for palette matching. Default perceptual.
    pub metric: DistanceMetric,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            diffuse: 0.8,
            ordered: 0.0,
            noise: 0,
            kernel: DitherKernel::default(),
            metric: DistanceMetric::default(),
        }
    }
}

impl DitherOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error diffusion strength.
    #[inline]
    pub fn diffuse(mut self, strength: f32) -> Self {
        self.diffuse = strength;
        self
    }

    /// Set the ordered-dither strength.
    #[inline]
    pub fn ordered(mut self, strength: f32) -> Self {
        self.ordered = strength;
        self
    }

    /// Set the initial noise amplitude.
    #[inline]
    pub fn noise(mut self, amplitude: i32) -> Self {
        self.noise = amplitude;
        self
    }

    /// Set the diffusion kernel.
    #[inline]
    pub fn kernel(mut self, kernel: DitherKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the distance metric.
    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}
