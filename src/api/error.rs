use thiserror::Error;

use crate::dither::CanvasError;
use crate::palette::PaletteError;

/// Anything that can go wrong driving a full dithering run.
#[derive(Debug, Error)]
pub enum DitherError {
    /// The preset's palette could not be used.
    #[error(transparent)]
    Palette(#[from] PaletteError),

    /// The source buffer does not match the preset's dimensions.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
