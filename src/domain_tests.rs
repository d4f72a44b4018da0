//! End-to-end scenarios exercising the whole pipeline through the public
//! API, as a guard against regressions in the interplay of reduction,
//! diffusion, and annealing that the per-module tests cannot see.

use crate::{dither, intensity, DitherCanvas, DitherOptions, Palette, Preset, Rgba, MAX_PASSES};

fn preset(json: &str) -> Preset {
    serde_json::from_str(json).unwrap()
}

fn gray(v: u8) -> Rgba {
    Rgba::from_channels(v, v, v)
}

#[test]
fn test_mid_gray_splits_between_black_and_white() {
    // A tiny solid mid-gray patch against a black/white palette must come
    // out mixed: diffusion forces at least one pixel to each extreme.
    let source = vec![gray(128); 4];
    let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();

    let mut canvas = DitherCanvas::new(&source, 2, palette)
        .unwrap()
        .with_options(&DitherOptions::new().diffuse(0.8));
    canvas.run(None);

    let whites = canvas
        .pixels()
        .iter()
        .filter(|&&p| p == Rgba::WHITE)
        .count();
    assert!(
        (1..=3).contains(&whites),
        "expected a mix of black and white, got {whites} white pixels"
    );
}

#[test]
fn test_deterministic_without_noise() {
    // With noise off the pipeline has no random input, so two runs over the
    // same source must agree bit for bit.
    let source: Vec<Rgba> = (0..256)
        .map(|i| Rgba::from_channels((i % 256) as u8, ((i * 7) % 256) as u8, 200))
        .collect();
    let p = preset(
        r##"{
            "id": "cga", "name": "CGA Palette 1",
            "width": 16, "height": 16,
            "palette": ["#000000", "#55FFFF", "#FF55FF", "#FFFFFF"],
            "diffuse": 0.75
        }"##,
    );

    let first = dither(&source, &p, None).unwrap();
    let second = dither(&source, &p, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_grayscale_ramp_reduces_to_spread_levels() {
    // Reducing a 16-entry gray master palette against a four-level image
    // must keep one entry near each level, sorted dark to light.
    let levels = [0u8, 85, 170, 255];
    let source: Vec<Rgba> = (0..4096).map(|i| gray(levels[i / 1024])).collect();

    let master: Vec<String> = (0..16)
        .map(|i| format!("#{0:02X}{0:02X}{0:02X}", i * 17))
        .collect();
    let p = preset(&format!(
        r##"{{
            "id": "gray4", "name": "Four Grays",
            "width": 64, "height": 64,
            "palette": [{}],
            "reduce": 4
        }}"##,
        master
            .iter()
            .map(|s| format!("\"{s}\""))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    let image = dither(&source, &p, None).unwrap();
    let reduced = image.palette();
    assert_eq!(reduced.len(), 4);

    for window in reduced.colors().windows(2) {
        assert!(
            intensity(window[0]) <= intensity(window[1]),
            "reduced palette must be sorted dark to light"
        );
    }
    for (i, &level) in levels.iter().enumerate() {
        let got = reduced.color(i).r();
        assert!(
            (got - level as f32).abs() <= 64.0,
            "entry {i} = {got}, expected near {level}"
        );
    }
}

#[test]
fn test_gameboy_preset_end_to_end() {
    let p = preset(
        r##"{
            "id": "gameboy", "name": "Nintendo Game Boy",
            "width": 8, "height": 8,
            "palette": ["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"],
            "diffuse": 0.7, "kernel": "atkinson"
        }"##,
    );
    let source: Vec<Rgba> = (0..64)
        .map(|i| gray((i * 255 / 63) as u8))
        .collect();

    let image = dither(&source, &p, None).unwrap();

    assert!(image.passes() <= MAX_PASSES);
    assert!(image.indices().iter().all(|&i| i < 4));
    let palette = image.palette();
    for &px in image.pixels() {
        assert!(palette.colors().contains(&px));
    }
    // The ramp covers the full range, so the darkest and lightest greens
    // must both appear.
    assert!(image.indices().contains(&0));
    assert!(image.indices().contains(&3));
}

#[test]
fn test_duplicate_master_entries_survive_the_pipeline() {
    // Retro master palettes repeat colors; duplicates must neither break
    // parsing nor reduction.
    let p = preset(
        r##"{
            "id": "dup", "name": "Duplicates",
            "width": 4, "height": 4,
            "palette": ["#000000", "#000000", "#FFFFFF", "#FFFFFF", "#808080"],
            "reduce": 2
        }"##,
    );
    let source: Vec<Rgba> = (0..16)
        .map(|i| if i % 2 == 0 { gray(10) } else { gray(245) })
        .collect();

    let image = dither(&source, &p, None).unwrap();
    assert_eq!(image.palette().len(), 2);
    assert!(image.indices().iter().all(|&i| i < 2));
}
