//! The finished product of a dithering run.

use crate::color::Rgba;
use crate::palette::Palette;

/// An indexed image produced by a dithering run.
///
/// Holds both views of the result: the flattened RGB pixels for preview and
/// the per-pixel palette indices for native-format exporters, together with
/// the palette that was actually used (the reduced one, when reduction ran).
#[derive(Debug, Clone, PartialEq)]
pub struct DitheredImage {
    pixels: Vec<Rgba>,
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
    passes: usize,
}

impl DitheredImage {
    /// Assemble a result. `indices` are `u8` because target palettes hold at
    /// most 256 entries.
    pub(crate) fn new(
        pixels: Vec<Rgba>,
        indices: Vec<u8>,
        width: usize,
        height: usize,
        palette: Palette,
        passes: usize,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        debug_assert_eq!(indices.len(), width * height);
        Self {
            pixels,
            indices,
            width,
            height,
            palette,
            passes,
        }
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

    /// Quantized pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Palette index per pixel, row-major.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// The palette the indices refer to.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Passes the run took to settle.
    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Flatten the pixels to interleaved `R, G, B` bytes, e.g. for a PNG
    /// encoder or a preview texture upload.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for px in &self.pixels {
            bytes.extend_from_slice(&px.to_bytes());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_bytes_interleaving() {
        let palette = Palette::from_hex(&["#102030", "#405060"]).unwrap();
        let pixels = vec![palette.color(0), palette.color(1)];
        let image = DitheredImage::new(pixels, vec![0, 1], 2, 1, palette, 1);

        assert_eq!(
            image.to_rgb_bytes(),
            vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60]
        );
    }
}
