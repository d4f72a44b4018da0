//! Packed color type and distance metrics.
//!
//! Everything in this module is pure and stateless: a [`Rgba`] newtype over
//! the engine's packed 32-bit layout, the three [`DistanceMetric`] variants,
//! and the nearest-color search helpers the canvas and palette reducer share.

mod distance;
mod rgba;

pub use distance::{closest_index, intensity, rgb_diff, DistanceMetric};
pub use rgba::Rgba;
