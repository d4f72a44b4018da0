//! Error-diffusion dithering: kernels, tunables, and the iterative canvas.

mod canvas;
mod kernel;
mod options;

pub use canvas::{CanvasError, DitherCanvas, MAX_PASSES};
pub use kernel::{
    DitherKernel, Kernel, ATKINSON, FALSE_FLOYD_STEINBERG, FLOYD_STEINBERG, SIERRA_LITE,
    SIERRA_TWO_ROW,
};
pub use options::DitherOptions;
