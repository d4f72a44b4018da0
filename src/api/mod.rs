//! Preset-driven entry points.

mod engine;
mod error;
mod preset;

pub use engine::dither;
pub use error::DitherError;
pub use preset::Preset;
