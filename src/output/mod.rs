//! Result types handed back to callers.

mod dithered_image;

pub use dithered_image::DitheredImage;
