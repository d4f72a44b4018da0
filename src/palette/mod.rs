//! Palette types and image-adapted reduction.

mod error;
#[allow(clippy::module_inception)]
mod palette;
mod reduce;

pub use error::{PaletteError, ParseColorError};
pub use palette::Palette;
pub use reduce::reduce_palette;
