//! Convert full-color images into the fixed palettes of retro computers and
//! consoles.
//!
//! The engine runs iterative error-diffusion dithering: every pass scans the
//! image in serpentine order, quantizes each pixel against the target
//! palette, and pushes the residual onto unvisited neighbors through a
//! selectable kernel. Passes repeat with a slowly rising change-acceptance
//! threshold until the image settles or the pass cap is hit, so noisy
//! near-ties anneal out instead of flickering forever. Oversized master
//! palettes can first be reduced to a per-image subset with a bounded
//! k-means pass.
//!
//! The usual entry point is [`dither`] with a JSON-friendly [`Preset`]; the
//! lower-level [`DitherCanvas`] and [`reduce_palette`] are exposed for
//! callers that drive the passes themselves.
//!
//! ```
//! use retro_dither::{dither, Preset, Rgba};
//!
//! let preset: Preset = serde_json::from_str(r##"{
//!     "id": "gameboy", "name": "Nintendo Game Boy",
//!     "width": 4, "height": 4,
//!     "palette": ["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"]
//! }"##).unwrap();
//!
//! let source = vec![Rgba::from_channels(140, 160, 40); 16];
//! let image = dither(&source, &preset, None).unwrap();
//!
//! assert_eq!(image.pixels().len(), 16);
//! assert!(image.indices().iter().all(|&i| (i as usize) < 4));
//! ```

mod api;
mod color;
mod dither;
mod output;
mod palette;

#[cfg(test)]
mod domain_tests;

pub use api::{dither, DitherError, Preset};
pub use color::{closest_index, intensity, rgb_diff, DistanceMetric, Rgba};
pub use dither::{
    CanvasError, DitherCanvas, DitherKernel, DitherOptions, Kernel, ATKINSON,
    FALSE_FLOYD_STEINBERG, FLOYD_STEINBERG, MAX_PASSES, SIERRA_LITE, SIERRA_TWO_ROW,
};
pub use output::DitheredImage;
pub use palette::{reduce_palette, Palette, PaletteError, ParseColorError};
