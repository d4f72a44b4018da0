//! Color distance metrics.
//!
//! Three ways of measuring how far apart two packed colors are, each with a
//! squared variant that skips the square root for ranking-only paths. The
//! squared forms produce the same orderings as the rooted forms, which is all
//! the nearest-color searches need.

use super::rgba::Rgba;

/// Distance metric for nearest-color matching.
///
/// Resolved once at configuration time (from a preset's metric name) into a
/// concrete variant; the hot per-pixel loop only ever matches on this enum,
/// never on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Weighted Euclidean distance approximating human color sensitivity.
    ///
    /// The red and blue weights shift with the mean red level of the two
    /// colors ("redmean"):
    ///
    /// ```text
    /// d² = ((512 + rmean)/256)·Δr² + 4·Δg² + ((767 − rmean)/256)·Δb²
    /// ```
    ///
    /// Default metric throughout the engine.
    #[default]
    Perceptual,

    /// Plain Euclidean distance over (R, G, B).
    Absolute,

    /// Chebyshev distance: the largest single-channel absolute difference.
    Max,
}

impl DistanceMetric {
    /// Resolve a metric from its preset name.
    ///
    /// Recognized names: `"perceptual"`, `"absolute"` (alias `"dist"`),
    /// `"max"`. Unknown names silently fall back to [`Perceptual`]
    /// (a malformed preset must not fail the run).
    ///
    /// [`Perceptual`]: DistanceMetric::Perceptual
    pub fn from_name(name: &str) -> Self {
        match name {
            "perceptual" => DistanceMetric::Perceptual,
            "absolute" | "dist" => DistanceMetric::Absolute,
            "max" => DistanceMetric::Max,
            _ => DistanceMetric::Perceptual,
        }
    }

    /// Distance between two colors.
    #[inline]
    pub fn distance(self, a: Rgba, b: Rgba) -> f32 {
        match self {
            DistanceMetric::Perceptual | DistanceMetric::Absolute => {
                self.distance_squared(a, b).sqrt()
            }
            DistanceMetric::Max => chebyshev(a, b),
        }
    }

    /// Squared distance.
    ///
    /// Produces the same ordering as [`distance`](Self::distance) without the
    /// square root; use this wherever only the ranking matters.
    #[inline]
    pub fn distance_squared(self, a: Rgba, b: Rgba) -> f32 {
        match self {
            DistanceMetric::Perceptual => {
                let rmean = (a.r() + b.r()) / 2.0;
                let dr = a.r() - b.r();
                let dg = a.g() - b.g();
                let db = a.b() - b.b();
                ((512.0 + rmean) * dr * dr / 256.0)
                    + 4.0 * dg * dg
                    + ((767.0 - rmean) * db * db / 256.0)
            }
            DistanceMetric::Absolute => {
                let dr = a.r() - b.r();
                let dg = a.g() - b.g();
                let db = a.b() - b.b();
                dr * dr + dg * dg + db * db
            }
            DistanceMetric::Max => {
                let m = chebyshev(a, b);
                m * m
            }
        }
    }
}

#[inline]
fn chebyshev(a: Rgba, b: Rgba) -> f32 {
    let dr = (a.r() - b.r()).abs();
    let dg = (a.g() - b.g()).abs();
    let db = (a.b() - b.b()).abs();
    dr.max(dg).max(db)
}

/// Perceptual distance from black, used for cosmetic palette sorting.
#[inline]
pub fn intensity(color: Rgba) -> f32 {
    DistanceMetric::Perceptual.distance(Rgba::BLACK, color)
}

/// Signed per-channel difference `(a − b)` as `[Δr, Δg, Δb]`.
///
/// This is the residual that seeds error diffusion; it is not a distance.
#[inline]
pub fn rgb_diff(a: Rgba, b: Rgba) -> [f32; 3] {
    [a.r() - b.r(), a.g() - b.g(), a.b() - b.b()]
}

/// Find the index of the closest candidate color.
///
/// Searches `colors`, optionally restricted to the `allowed` index subset,
/// using the squared form of `metric`. Ties break toward the first occurrence
/// in iteration order. Out-of-range entries in `allowed` are skipped; an
/// empty candidate set yields index 0.
pub fn closest_index(
    color: Rgba,
    colors: &[Rgba],
    allowed: Option<&[usize]>,
    metric: DistanceMetric,
) -> usize {
    let mut best_idx = 0;
    let mut best_score = f32::INFINITY;

    match allowed {
        Some(indices) => {
            for &idx in indices {
                if idx >= colors.len() {
                    continue;
                }
                let score = metric.distance_squared(color, colors[idx]);
                if score < best_score {
                    best_score = score;
                    best_idx = idx;
                }
            }
        }
        None => {
            for (idx, &candidate) in colors.iter().enumerate() {
                let score = metric.distance_squared(color, candidate);
                if score < best_score {
                    best_score = score;
                    best_idx = idx;
                }
            }
        }
    }

    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: [DistanceMetric; 3] = [
        DistanceMetric::Perceptual,
        DistanceMetric::Absolute,
        DistanceMetric::Max,
    ];

    fn sample_colors() -> Vec<Rgba> {
        vec![
            Rgba::BLACK,
            Rgba::WHITE,
            Rgba::from_channels(255, 0, 0),
            Rgba::from_channels(0, 255, 0),
            Rgba::from_channels(0, 0, 255),
            Rgba::from_channels(128, 64, 32),
            Rgba::from_channels(13, 200, 77),
        ]
    }

    #[test]
    fn test_identity() {
        for metric in METRICS {
            for &c in &sample_colors() {
                assert_eq!(
                    metric.distance(c, c),
                    0.0,
                    "{metric:?} must be zero for identical colors"
                );
            }
        }
    }

    #[test]
    fn test_symmetry() {
        let colors = sample_colors();
        for metric in METRICS {
            for &a in &colors {
                for &b in &colors {
                    assert_eq!(
                        metric.distance(a, b),
                        metric.distance(b, a),
                        "{metric:?} must be symmetric"
                    );
                }
            }
        }
    }

    #[test]
    fn test_squared_preserves_ordering() {
        let colors = sample_colors();
        let probe = Rgba::from_channels(100, 150, 200);
        for metric in METRICS {
            for &a in &colors {
                for &b in &colors {
                    let rooted = metric.distance(probe, a) < metric.distance(probe, b);
                    let squared =
                        metric.distance_squared(probe, a) < metric.distance_squared(probe, b);
                    assert_eq!(
                        rooted, squared,
                        "{metric:?} squared form must rank {a:?} vs {b:?} identically"
                    );
                }
            }
        }
    }

    #[test]
    fn test_perceptual_redmean_weighting() {
        // A pure-red delta near the red end of the range weighs more than
        // the same delta near the blue end weighs in blue.
        let dr = DistanceMetric::Perceptual.distance_squared(
            Rgba::from_channels(255, 0, 0),
            Rgba::from_channels(245, 0, 0),
        );
        let db = DistanceMetric::Perceptual.distance_squared(
            Rgba::from_channels(0, 0, 255),
            Rgba::from_channels(0, 0, 245),
        );
        assert!(dr < db, "high-red deltas weigh red less than blue: {dr} vs {db}");
    }

    #[test]
    fn test_max_is_chebyshev() {
        let a = Rgba::from_channels(10, 200, 50);
        let b = Rgba::from_channels(30, 100, 55);
        assert_eq!(DistanceMetric::Max.distance(a, b), 100.0);
    }

    #[test]
    fn test_intensity_monotonic_on_grays() {
        let mut last = -1.0;
        for v in (0..=255).step_by(17) {
            let i = intensity(Rgba::from_channels(v as u8, v as u8, v as u8));
            assert!(i > last, "intensity must grow along the gray ramp");
            last = i;
        }
    }

    #[test]
    fn test_rgb_diff_signed() {
        let a = Rgba::from_channels(10, 250, 100);
        let b = Rgba::from_channels(20, 200, 100);
        assert_eq!(rgb_diff(a, b), [-10.0, 50.0, 0.0]);
    }

    #[test]
    fn test_closest_index_full_palette() {
        let pal = sample_colors();
        let idx = closest_index(
            Rgba::from_channels(250, 5, 5),
            &pal,
            None,
            DistanceMetric::Perceptual,
        );
        assert_eq!(idx, 2, "near-red must match the red entry");
    }

    #[test]
    fn test_closest_index_singleton_allowed() {
        let pal = sample_colors();
        // A singleton allowed set wins regardless of distance.
        let idx = closest_index(
            Rgba::from_channels(250, 5, 5),
            &pal,
            Some(&[4]),
            DistanceMetric::Perceptual,
        );
        assert_eq!(idx, 4);
    }

    #[test]
    fn test_closest_index_tie_breaks_first() {
        let pal = vec![
            Rgba::from_channels(100, 100, 100),
            Rgba::from_channels(100, 100, 100),
        ];
        let idx = closest_index(
            Rgba::from_channels(100, 100, 100),
            &pal,
            None,
            DistanceMetric::Absolute,
        );
        assert_eq!(idx, 0, "ties must break toward the first occurrence");
    }

    #[test]
    fn test_closest_index_skips_out_of_range() {
        let pal = sample_colors();
        let idx = closest_index(Rgba::BLACK, &pal, Some(&[99, 1]), DistanceMetric::Absolute);
        assert_eq!(idx, 1, "out-of-range allowed entries are skipped");
    }

    #[test]
    fn test_from_name_fallback() {
        assert_eq!(
            DistanceMetric::from_name("perceptual"),
            DistanceMetric::Perceptual
        );
        assert_eq!(
            DistanceMetric::from_name("absolute"),
            DistanceMetric::Absolute
        );
        assert_eq!(DistanceMetric::from_name("dist"), DistanceMetric::Absolute);
        assert_eq!(DistanceMetric::from_name("max"), DistanceMetric::Max);
        assert_eq!(
            DistanceMetric::from_name("no-such-metric"),
            DistanceMetric::Perceptual,
            "unknown metric names fall back to perceptual"
        );
    }
}
