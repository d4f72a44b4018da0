//! Image-adapted palette reduction.
//!
//! Selects the `target` entries of a large master palette that best represent
//! a specific image, using a bounded k-means over the image's pixels with
//! error diffusion carried between sampled pixels. The error carry is what
//! spreads centroid selection across the image's tonal range instead of
//! letting centroids pile up on the dominant color.

use crate::color::{DistanceMetric, Rgba};

use super::palette::Palette;

/// Maximum refinement rounds before giving up on convergence.
const MAX_ROUNDS: usize = 10;

/// Running mean accumulator for one centroid.
#[derive(Clone, Copy, Default)]
struct Centroid {
    r: f32,
    g: f32,
    b: f32,
    n: u32,
}

impl Centroid {
    #[inline]
    fn add(&mut self, pixel: Rgba) {
        self.r += pixel.r();
        self.g += pixel.g();
        self.b += pixel.b();
        self.n += 1;
    }

    /// Mean color scaled by `bias`. A centroid that attracted no pixels is
    /// treated as black rather than dividing by zero.
    fn mean(&self, bias: f32) -> Rgba {
        if self.n == 0 {
            return Rgba::BLACK;
        }
        let n = self.n as f32;
        Rgba::pack(self.r * bias / n, self.g * bias / n, self.b * bias / n)
    }
}

/// Reduce `palette` to its `target` entries best representing `image`.
///
/// Returns the reduced palette sorted by ascending intensity. A no-op
/// (cloning the input) when the palette already has at most `target` colors,
/// or when `target` is zero.
///
/// `diversity` in `0.0..=1.0` controls how far apart the chosen colors are
/// pushed: it weakens the decay of the inter-pixel error carry (more carry
/// spreads centroid assignment wider) and scales the centroid means outward.
///
/// Pixel-to-centroid scoring always uses squared perceptual distance (it only
/// ranks, and it is the hot path); centroid moves use the caller-supplied
/// `metric`, matching how the final dither pass will judge colors.
///
/// # Example
///
/// ```
/// use retro_dither::{reduce_palette, DistanceMetric, Palette, Rgba};
///
/// let master: Vec<Rgba> = (0..64)
///     .map(|i| Rgba::from_channels((i * 4) as u8, (i * 4) as u8, (i * 4) as u8))
///     .collect();
/// let master = Palette::new(&master).unwrap();
/// let image = vec![Rgba::BLACK; 64];
///
/// let reduced = reduce_palette(&image, &master, 4, 0.0, DistanceMetric::Perceptual);
/// assert_eq!(reduced.len(), 4);
/// ```
pub fn reduce_palette(
    image: &[Rgba],
    palette: &Palette,
    target: usize,
    diversity: f32,
    metric: DistanceMetric,
) -> Palette {
    if target == 0 || palette.len() <= target {
        return palette.clone();
    }

    let decay = diversity * 0.5 + 0.4;
    let bias = 1.0 + diversity * 0.5;

    // Seed centroid indices evenly spaced through the master palette.
    let mut selected: Vec<usize> = (0..target)
        .map(|i| (i as f32 * (palette.len() - 1) as f32 / target as f32) as usize)
        .collect();

    // Per-entry match-quality histogram. Diagnostic, but the scores must be
    // accumulated inside the loop so the scan cost stays representative.
    let mut histo = vec![0i32; palette.len()];

    for round in 0..MAX_ROUNDS {
        let mut centroids = vec![Centroid::default(); target];

        // The running error accumulator is deliberately i32: the truncating
        // casts at the decay step are part of the algorithm's observable
        // convergence behavior, not an optimization.
        let mut err = [0i32; 3];

        // Stride through pixels with a self-advancing step of (i & 15) + 1:
        // a deterministic subsample, since exhaustive scanning buys nothing.
        let mut i = round;
        while i < image.len() {
            let [r, g, b] = image[i].to_bytes();
            err[0] += r as i32;
            err[1] += g as i32;
            err[2] += b as i32;

            let adjusted = Rgba::from_channels(
                err[0].clamp(0, 255) as u8,
                err[1].clamp(0, 255) as u8,
                err[2].clamp(0, 255) as u8,
            );

            let chosen_idx =
                palette.find_nearest_among(adjusted, &selected, DistanceMetric::Perceptual);
            if let Some(pos) = selected.iter().position(|&s| s == chosen_idx) {
                centroids[pos].add(adjusted);
            }

            let chosen = palette.color(chosen_idx);
            let score = metric.distance(adjusted, chosen);
            histo[chosen_idx] += (256 - score as i32).max(0);

            let [cr, cg, cb] = chosen.to_bytes();
            err[0] -= cr as i32;
            err[1] -= cg as i32;
            err[2] -= cb as i32;
            // The cast truncates toward zero.
            for ch in err.iter_mut() {
                *ch = (*ch as f32 * decay) as i32;
            }

            i += (i & 15) + 1;
        }

        // Move each centroid to the closest still-unclaimed palette entry.
        // Claiming compares by color value so duplicate master entries are
        // all retired at once.
        let mut available: Vec<usize> = (0..palette.len()).collect();
        let mut changed = false;

        for j in 0..target {
            let mean = centroids[j].mean(bias);
            let new_idx = palette.find_nearest_among(mean, &available, metric);

            if palette.color(new_idx) != palette.color(selected[j]) {
                selected[j] = new_idx;
                changed = true;
            }

            let claimed = palette.color(new_idx);
            available.retain(|&k| palette.color(k) != claimed);
        }

        if !changed {
            break;
        }
    }

    let colors: Vec<Rgba> = selected.iter().map(|&idx| palette.color(idx)).collect();

    // Non-empty by construction: target >= 1 entries were selected.
    Palette::new(&colors)
        .expect("reduced palette is never empty")
        .sorted_by_intensity()
}
