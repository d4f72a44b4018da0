//! The iterative error-diffusion canvas.
//!
//! [`DitherCanvas`] owns every buffer for one dithering run and drives the
//! iterate-to-convergence loop: serpentine passes, ordered-dither modulation,
//! optional noise, and temperature annealing. One instance processes exactly
//! one image against one palette; it is not reused across source images.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::color::{rgb_diff, DistanceMetric, Rgba};
use crate::palette::Palette;

use super::kernel::Kernel;
use super::options::DitherOptions;

/// Hard cap on the number of passes for one run.
pub const MAX_PASSES: usize = 100;

/// Passes to run before annealing starts adjusting the tunables.
const WARMUP_PASSES: usize = 5;

/// Per-pass growth of the change-acceptance threshold once annealing starts.
const THRESHOLD_STEP: f32 = 0.04;

/// 8x8 Bayer ordered-dithering threshold matrix, values 0..=63.
#[rustfmt::skip]
const BAYER_8X8: [f32; 64] = [
     0.0, 48.0, 12.0, 60.0,  3.0, 51.0, 15.0, 63.0,
    32.0, 16.0, 44.0, 28.0, 35.0, 19.0, 47.0, 31.0,
     8.0, 56.0,  4.0, 52.0, 11.0, 59.0,  7.0, 55.0,
    40.0, 24.0, 36.0, 20.0, 43.0, 27.0, 39.0, 23.0,
     2.0, 50.0, 14.0, 62.0,  1.0, 49.0, 13.0, 61.0,
    34.0, 18.0, 46.0, 30.0, 33.0, 17.0, 45.0, 29.0,
    10.0, 58.0,  6.0, 54.0,  9.0, 57.0,  5.0, 53.0,
    42.0, 26.0, 38.0, 22.0, 41.0, 25.0, 37.0, 21.0,
];

/// Caller contract violations detected before a run starts.
///
/// The run loop itself has no failure surface; out-of-range neighbor writes
/// during diffusion are expected boundary conditions and silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// Image width must be non-zero.
    #[error("image width must be non-zero")]
    ZeroWidth,

    /// Source pixel count must be a whole number of rows.
    #[error("source length {len} is not a multiple of width {width}")]
    BufferSize {
        /// Source pixel count.
        len: usize,
        /// Stated image width.
        width: usize,
    },
}

/// Per-run state machine for iterative error-diffusion dithering.
///
/// The canvas holds four per-pixel buffers: the immutable *reference* image,
/// the *output* image (latest quantization decision per pixel), the
/// *adjusted* intermediate (error-applied, pre-quantization), and the float
/// error accumulator that is cleared at the start of every pass. A fifth
/// buffer, the *index map*, records which palette entry each pixel is
/// tracked as. The index map is sticky: it is only overwritten when the
/// change-acceptance test passes, which is what lets the run converge
/// instead of flickering between near-tied colors forever.
///
/// # Example
///
/// ```
/// use retro_dither::{DitherCanvas, DitherOptions, Palette, Rgba};
///
/// let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
/// let source = vec![Rgba::from_channels(128, 128, 128); 4];
///
/// let mut canvas = DitherCanvas::new(&source, 2, palette)
///     .unwrap()
///     .with_options(&DitherOptions::new());
/// let passes = canvas.run(None);
/// assert!(passes <= retro_dither::MAX_PASSES);
/// ```
pub struct DitherCanvas {
    palette: Palette,
    width: usize,
    height: usize,

    reference: Vec<Rgba>,
    output: Vec<Rgba>,
    adjusted: Vec<Rgba>,
    /// Three floats (R, G, B) per pixel.
    error: Vec<f32>,
    indexed: Vec<usize>,

    diffuse: f32,
    initial_diffuse: f32,
    ordered: f32,
    noise: i32,
    error_threshold: f32,
    kernel: &'static Kernel,
    metric: DistanceMetric,

    pass_count: usize,
    changes: usize,
    reversed: bool,
    rng: SmallRng,
}

impl DitherCanvas {
    /// Create a canvas over `source` pixels at the given `width`.
    ///
    /// The reference and output buffers both start as copies of the source;
    /// the error accumulator and index map start zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ZeroWidth`] or [`CanvasError::BufferSize`]
    /// when the stated width does not describe `source` as whole rows.
    pub fn new(source: &[Rgba], width: usize, palette: Palette) -> Result<Self, CanvasError> {
        if width == 0 {
            return Err(CanvasError::ZeroWidth);
        }
        if source.len() % width != 0 {
            return Err(CanvasError::BufferSize {
                len: source.len(),
                width,
            });
        }

        let defaults = DitherOptions::default();
        Ok(Self {
            palette,
            width,
            height: source.len() / width,
            reference: source.to_vec(),
            output: source.to_vec(),
            adjusted: source.to_vec(),
            error: vec![0.0; source.len() * 3],
            indexed: vec![0; source.len()],
            diffuse: defaults.diffuse,
            initial_diffuse: defaults.diffuse,
            ordered: defaults.ordered,
            noise: defaults.noise,
            error_threshold: 0.0,
            kernel: defaults.kernel.table(),
            metric: defaults.metric,
            pass_count: 0,
            changes: 0,
            reversed: false,
            rng: SmallRng::from_entropy(),
        })
    }

    /// Apply a full set of tunables, consuming and returning the canvas.
    ///
    /// The kernel and metric are resolved here, once; the per-pixel loop
    /// never dispatches by name.
    pub fn with_options(mut self, options: &DitherOptions) -> Self {
        self.diffuse = options.diffuse;
        self.initial_diffuse = options.diffuse;
        self.ordered = options.ordered;
        self.noise = options.noise;
        self.kernel = options.kernel.table();
        self.metric = options.metric;
        self
    }

    /// Replace the palette on a live canvas.
    ///
    /// Pixels whose tracked index is out of range for the new palette are
    /// corrected unconditionally on their next visit, bypassing the
    /// change-acceptance threshold.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The palette in use.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Output pixels (the latest quantization decision per pixel).
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.output
    }

    /// Tracked palette index per pixel.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indexed
    }

    /// Passes completed so far.
    #[inline]
    pub fn passes(&self) -> usize {
        self.pass_count
    }

    /// Accepted index changes in the most recent pass.
    #[inline]
    pub fn changes(&self) -> usize {
        self.changes
    }

    /// Process one pixel: modulate, apply error, quantize, diffuse residual.
    fn update(&mut self, offset: usize) {
        let errofs = offset * 3;
        let reference = self.reference[offset];

        // Ordered-dither modulation from the Bayer matrix; identity when the
        // ordered strength is zero.
        let mut ko = 1.0;
        if self.ordered > 0.0 {
            let tx = (offset % self.width) & 7;
            let ty = (offset / self.width) & 7;
            ko = 1.0 + (BAYER_8X8[tx + ty * 8] / 63.0 - 0.5) * self.ordered;
        }

        let mut channels = [
            reference.r() * ko + self.error[errofs],
            reference.g() * ko + self.error[errofs + 1],
            reference.b() * ko + self.error[errofs + 2],
        ];
        if self.noise > 0 {
            let amplitude = self.noise as f32;
            for ch in channels.iter_mut() {
                *ch += (self.rng.gen::<f32>() - 0.5) * amplitude;
            }
        }
        let adjusted = Rgba::pack(channels[0], channels[1], channels[2]);
        self.adjusted[offset] = adjusted;

        let palidx = self.palette.find_nearest(adjusted, self.metric);
        let chosen = self.palette.color(palidx);
        let residual = rgb_diff(adjusted, chosen);

        // Diffuse the residual to forward neighbors, mirroring dx on
        // right-to-left rows. Out-of-range targets are dropped; this pixel's
        // own error slot is consumed and zeroed.
        let x = (offset % self.width) as i32;
        let y = (offset / self.width) as i32;
        let dir = if self.reversed { -1 } else { 1 };
        let divisor = self.kernel.divisor as f32;

        for channel in 0..3 {
            let k = residual[channel] * self.diffuse;
            for &(dx, dy, weight) in self.kernel.entries {
                let nx = x + dx * dir;
                let ny = y + dy;
                if nx >= 0 && nx < self.width as i32 && ny < self.height as i32 {
                    let target = (ny as usize * self.width + nx as usize) * 3 + channel;
                    self.error[target] += k * weight as f32 / divisor;
                }
            }
            self.error[errofs + channel] = 0.0;
        }

        // Change-acceptance hysteresis: a pixel only re-commits to a new
        // palette index when its residual is big enough to clear the current
        // threshold, or its tracked index is stale after a palette swap.
        let errmag =
            (residual[0].abs() + residual[1].abs() * 2.0 + residual[2].abs()) / 1024.0;
        if self.indexed[offset] != palidx {
            let stale = self.indexed[offset] >= self.palette.len();
            if errmag >= self.error_threshold || stale {
                self.indexed[offset] = palidx;
                self.changes += 1;
            }
        }

        // The display buffer always reflects the latest decision; only the
        // tracked index above is sticky.
        self.output[offset] = chosen;
    }

    /// Run one full pass over the image.
    ///
    /// Clears the error accumulator, then visits every pixel exactly once in
    /// serpentine order: even rows left-to-right, odd rows right-to-left, so
    /// diffused error always lands on not-yet-visited pixels.
    pub fn iterate(&mut self) {
        self.changes = 0;
        self.error.fill(0.0);

        for row in 0..self.height {
            self.reversed = row & 1 == 1;
            let base = row * self.width;
            if self.reversed {
                for col in (0..self.width).rev() {
                    self.update(base + col);
                }
            } else {
                for col in 0..self.width {
                    self.update(base + col);
                }
            }
        }
        self.reversed = false;
        self.pass_count += 1;
    }

    /// Run passes until convergence, cancellation, or the pass cap.
    ///
    /// After each pass the noise amplitude is halved, and once past the
    /// warm-up the diffusion strength cools toward half its initial value at
    /// 1% per pass while the acceptance threshold grows by a fixed step;
    /// the rising threshold is what drives convergence.
    ///
    /// The optional `progress` callback is invoked once per completed pass
    /// with `(pass, cap, is_final)`; returning `false` cancels before the
    /// next pass starts. There is no mid-pass cancellation.
    ///
    /// Returns the number of passes performed, always `<=` [`MAX_PASSES`].
    pub fn run(
        &mut self,
        mut progress: Option<&mut dyn FnMut(usize, usize, bool) -> bool>,
    ) -> usize {
        while self.pass_count < MAX_PASSES {
            self.iterate();

            self.noise >>= 1;
            if self.pass_count > WARMUP_PASSES {
                let cooled = 1.0 - (self.pass_count - WARMUP_PASSES) as f32 * 0.01;
                self.diffuse = self.initial_diffuse * cooled.max(0.5);
            }
            if self.pass_count >= WARMUP_PASSES {
                self.error_threshold += THRESHOLD_STEP;
            }

            let is_final = self.changes == 0 || self.pass_count >= MAX_PASSES;
            if let Some(callback) = progress.as_mut() {
                if !callback(self.pass_count, MAX_PASSES, is_final) {
                    break;
                }
            }
            if is_final {
                break;
            }
        }
        self.pass_count
    }
}
