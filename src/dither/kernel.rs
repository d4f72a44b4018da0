//! Error diffusion kernel definitions.
//!
//! Each kernel is a static table describing how a pixel's quantization error
//! is spread to neighbors that have not been visited yet. Tables are always
//! authored for left-to-right scanning; the canvas negates `dx` at the call
//! site on right-to-left serpentine rows, never mutating the tables.

/// An error diffusion kernel.
///
/// Entries are `(dx, dy, weight)` with the weight expressed as a numerator
/// over `divisor`: each neighbor receives `error * weight / divisor`. Weights
/// sum to at most `divisor`, so no kernel amplifies error.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// `(dx, dy, weight)` neighbor entries, authored for left-to-right scans.
    pub entries: &'static [(i32, i32, u8)],

    /// Divisor normalizing the weights.
    pub divisor: u8,

    /// Maximum `dy` over the entries (how many rows ahead the kernel reaches).
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the error this kernel propagates in total.
    pub fn propagation(&self) -> f32 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        sum as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg kernel, the classic general-purpose choice.
///
/// ```text
///        X   7
///    3   5   1      (/16)
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// "False" Floyd-Steinberg: a simplified three-neighbor variant.
///
/// ```text
///    X   3
///    3   2      (/8)
/// ```
pub const FALSE_FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 3), (0, 1, 3), (1, 1, 2)],
    divisor: 8,
    max_dy: 1,
};

/// Atkinson kernel: six equal weights over three rows.
///
/// ```text
///        X   1   1
///    1   1   1
///        1          (/6)
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 6,
    max_dy: 2,
};

/// Sierra Two-Row kernel.
///
/// ```text
///            X   4   3
///    1   2   3   2   1      (/16)
/// ```
pub const SIERRA_TWO_ROW: Kernel = Kernel {
    entries: &[
        (1, 0, 4),
        (2, 0, 3),
        (-2, 1, 1),
        (-1, 1, 2),
        (0, 1, 3),
        (1, 1, 2),
        (2, 1, 1),
    ],
    divisor: 16,
    max_dy: 1,
};

/// Sierra Lite kernel, the smallest of the family.
///
/// ```text
///    X   2
///    1   1      (/4)
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
    max_dy: 1,
};

/// Kernel selection for canvas configuration.
///
/// Resolved once per run from a preset's kernel name; unknown names fall
/// back to Floyd-Steinberg rather than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherKernel {
    /// Floyd-Steinberg (default).
    #[default]
    FloydSteinberg,
    /// Simplified Floyd-Steinberg.
    FalseFloydSteinberg,
    /// Atkinson.
    Atkinson,
    /// Sierra Two-Row.
    Sierra2,
    /// Sierra Lite.
    SierraLite,
}

impl DitherKernel {
    /// Resolve a kernel from its preset name.
    ///
    /// Recognized names: `"floyd"`, `"falsefloyd"`, `"atkinson"`,
    /// `"sierra2"`, `"sierralite"`. Anything else resolves to
    /// Floyd-Steinberg.
    pub fn from_name(name: &str) -> Self {
        match name {
            "floyd" => DitherKernel::FloydSteinberg,
            "falsefloyd" => DitherKernel::FalseFloydSteinberg,
            "atkinson" => DitherKernel::Atkinson,
            "sierra2" => DitherKernel::Sierra2,
            "sierralite" => DitherKernel::SierraLite,
            _ => DitherKernel::FloydSteinberg,
        }
    }

    /// The static diffusion table for this kernel.
    pub fn table(self) -> &'static Kernel {
        match self {
            DitherKernel::FloydSteinberg => &FLOYD_STEINBERG,
            DitherKernel::FalseFloydSteinberg => &FALSE_FLOYD_STEINBERG,
            DitherKernel::Atkinson => &ATKINSON,
            DitherKernel::Sierra2 => &SIERRA_TWO_ROW,
            DitherKernel::SierraLite => &SIERRA_LITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DitherKernel; 5] = [
        DitherKernel::FloydSteinberg,
        DitherKernel::FalseFloydSteinberg,
        DitherKernel::Atkinson,
        DitherKernel::Sierra2,
        DitherKernel::SierraLite,
    ];

    #[test]
    fn test_no_kernel_amplifies_error() {
        for kernel in ALL {
            let p = kernel.table().propagation();
            assert!(
                p <= 1.0 + f32::EPSILON,
                "{kernel:?} propagates {p}, must not exceed 1.0"
            );
        }
    }

    #[test]
    fn test_floyd_steinberg_propagates_exactly_100_percent() {
        let sum: u8 = FLOYD_STEINBERG.entries.iter().map(|&(_, _, w)| w).sum();
        assert_eq!(sum, 16, "7+3+5+1 must sum to the divisor");
        assert_eq!(FLOYD_STEINBERG.divisor, 16);
    }

    #[test]
    fn test_max_dy_matches_entries() {
        for kernel in ALL {
            let table = kernel.table();
            let actual = table
                .entries
                .iter()
                .map(|&(_, dy, _)| dy as usize)
                .max()
                .unwrap();
            assert_eq!(actual, table.max_dy, "{kernel:?} max_dy mismatch");
        }
    }

    #[test]
    fn test_entries_target_unvisited_pixels() {
        // In a left-to-right scan every entry must point right on the current
        // row, or to a later row.
        for kernel in ALL {
            for &(dx, dy, _) in kernel.table().entries {
                assert!(
                    dy > 0 || dx > 0,
                    "{kernel:?} entry ({dx},{dy}) targets an already-visited pixel"
                );
            }
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DitherKernel::from_name("floyd"), DitherKernel::FloydSteinberg);
        assert_eq!(
            DitherKernel::from_name("falsefloyd"),
            DitherKernel::FalseFloydSteinberg
        );
        assert_eq!(DitherKernel::from_name("atkinson"), DitherKernel::Atkinson);
        assert_eq!(DitherKernel::from_name("sierra2"), DitherKernel::Sierra2);
        assert_eq!(
            DitherKernel::from_name("sierralite"),
            DitherKernel::SierraLite
        );
        assert_eq!(
            DitherKernel::from_name("stucki"),
            DitherKernel::FloydSteinberg,
            "unknown kernel names fall back to Floyd-Steinberg"
        );
    }
}
