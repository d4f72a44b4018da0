//! The top-level orchestrator: preset in, indexed image out.

use tracing::debug;

use crate::color::Rgba;
use crate::dither::{DitherCanvas, DitherOptions};
use crate::output::DitheredImage;
use crate::palette::reduce_palette;

use super::error::DitherError;
use super::preset::Preset;

/// Dither `source` pixels for the display a preset describes.
///
/// Runs the full pipeline: parse the preset's palette, optionally reduce it
/// against this image, then iterate the canvas to convergence. The `source`
/// must already be scaled to the preset's resolution; its length is
/// validated against the preset width.
///
/// The optional `progress` callback receives `(pass, cap, is_final)` once
/// per completed pass and may return `false` to cancel; a cancelled run
/// still returns the best image so far.
///
/// # Errors
///
/// Fails when the preset's palette does not parse or the source buffer does
/// not match the preset's dimensions.
///
/// # Example
///
/// ```
/// use retro_dither::{dither, Preset, Rgba};
///
/// let preset: Preset = serde_json::from_str(r##"{
///     "id": "bw", "name": "Monochrome",
///     "width": 4, "height": 4,
///     "palette": ["#000000", "#FFFFFF"]
/// }"##).unwrap();
///
/// let source = vec![Rgba::from_channels(200, 200, 200); 16];
/// let image = dither(&source, &preset, None).unwrap();
/// assert_eq!(image.indices().len(), 16);
/// ```
pub fn dither(
    source: &[Rgba],
    preset: &Preset,
    progress: Option<&mut dyn FnMut(usize, usize, bool) -> bool>,
) -> Result<DitheredImage, DitherError> {
    let mut palette = preset.parsed_palette()?;

    if let Some(target) = preset.reduce {
        if target > 0 && palette.len() > target {
            debug!(
                preset = %preset.id,
                from = palette.len(),
                to = target,
                "reducing master palette against source image"
            );
            palette = reduce_palette(
                source,
                &palette,
                target,
                preset.effective_diversity(),
                preset.effective_metric(),
            );
        }
    }

    let options = DitherOptions::new()
        .diffuse(preset.effective_diffuse())
        .ordered(preset.effective_ordered())
        .noise(noise_amplitude(preset.effective_noise()))
        .kernel(preset.effective_kernel())
        .metric(preset.effective_metric());

    let mut canvas = DitherCanvas::new(source, preset.width, palette)?.with_options(&options);
    let passes = canvas.run(progress);
    debug!(preset = %preset.id, passes, changes = canvas.changes(), "dither run settled");

    // Index maps are u8; `as` would silently wrap past entry 255.
    debug_assert!(
        canvas.palette().len() <= 256,
        "palette indices must fit in u8"
    );
    let indices = canvas.indices().iter().map(|&i| i as u8).collect();
    Ok(DitheredImage::new(
        canvas.pixels().to_vec(),
        indices,
        canvas.width(),
        canvas.height(),
        canvas.palette().clone(),
        passes,
    ))
}

/// Map a preset noise level to a channel amplitude. Level 1 is subtle
/// (+-4), each further level doubles it.
fn noise_amplitude(level: i32) -> i32 {
    if level > 0 {
        1 << (level + 2)
    } else {
        0
    }
}
