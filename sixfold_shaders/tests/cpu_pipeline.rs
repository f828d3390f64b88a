// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessellation, accumulation and finalize run end to end on the CPU.

use sixfold_encoding::kurbo::{BezPath, Point};
use sixfold_encoding::{
    FinalizeMode, GlyphMeshes, GlyphTessellator, OutlineError, OutlineSource, RenderConfig,
    SampleScheme, TextLayout,
};
use sixfold_shaders::cpu::{self, CpuTarget};

const WHITE: [f32; 4] = [1.0; 4];

/// Draws every character as a box `0.2 * size` wide and `0.7 * size` tall on the baseline.
struct BoxGlyphs;

impl OutlineSource for BoxGlyphs {
    fn append_outline(
        &self,
        text: &str,
        font_size: f32,
        origin: Point,
        path: &mut BezPath,
    ) -> Result<(), OutlineError> {
        let size = f64::from(font_size);
        for (i, _) in text.chars().enumerate() {
            let x = origin.x + i as f64 * 0.5 * size;
            let (w, h) = (0.2 * size, 0.7 * size);
            path.move_to((x, origin.y));
            path.line_to((x, origin.y - h));
            path.line_to((x + w, origin.y - h));
            path.line_to((x + w, origin.y));
            path.line_to((x, origin.y));
            path.close_path();
        }
        Ok(())
    }
}

fn render(meshes: &GlyphMeshes, width: u32, height: u32, mode: FinalizeMode) -> Vec<u32> {
    let scheme = SampleScheme::new(width, height);
    let mut target = CpuTarget::new(width, height);
    cpu::accumulate(&mut target, meshes, &scheme, &RenderConfig::new(mode));
    cpu::finalize(&target, mode, WHITE)
}

fn accumulate(meshes: &GlyphMeshes, width: u32, height: u32) -> CpuTarget {
    let scheme = SampleScheme::new(width, height);
    let mut target = CpuTarget::new(width, height);
    cpu::accumulate(&mut target, meshes, &scheme, &RenderConfig::default());
    target
}

#[test]
fn rectangle_glyph_has_hard_edges() {
    let (width, height) = (1024, 768);
    let mut tessellator = GlyphTessellator::new(TextLayout::single_line(100.));
    let meshes = tessellator.tessellate(&BoxGlyphs, "I").unwrap();
    assert_eq!(meshes.fan.vertex_count(), 6);
    assert_eq!(meshes.fan.triangle_count(), 4);
    assert!(meshes.curves.is_empty());

    // The glyph spans x in [10, 30] and y in [30, 100]. All six sample offsets are
    // smaller than half a pixel, so every sample agrees on every pixel.
    let inside = |x: u32, y: u32| (10..30).contains(&x) && (30..100).contains(&y);
    for mode in [FinalizeMode::NoAa, FinalizeMode::Grayscale] {
        let pixels = render(&meshes, width, height, mode);
        for y in 0..height {
            for x in 0..width {
                let expected = if inside(x, y) { 0xff00_0000 } else { 0xffff_ffff };
                let px = pixels[(y * width + x) as usize];
                assert_eq!(px, expected, "{mode:?} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn subpixel_fringes_only_at_right_edge() {
    let mut tessellator = GlyphTessellator::new(TextLayout::single_line(100.));
    let meshes = tessellator.tessellate(&BoxGlyphs, "I").unwrap();
    let pixels = render(&meshes, 64, 128, FinalizeMode::Subpixel);
    let at = |x: u32, y: u32| pixels[(y * 64 + x) as usize];
    assert_eq!(at(15, 50), 0xff00_0000);
    assert_eq!(at(10, 50), 0xff00_0000);
    assert_eq!(at(40, 50), 0xffff_ffff);
    // The window of the last column reaches into the empty texel to its right.
    let [r, g, b, a] = at(29, 50).to_le_bytes();
    assert_eq!((r, a), (0, 255));
    assert!(g > 0 && b > g, "({r}, {g}, {b})");
}

#[test]
fn raw_mode_shows_packed_texel() {
    let mut tessellator = GlyphTessellator::new(TextLayout::single_line(100.));
    let meshes = tessellator.tessellate(&BoxGlyphs, "I").unwrap();
    let pixels = render(&meshes, 64, 128, FinalizeMode::Raw);
    assert_eq!(pixels[50 * 64 + 15], 0xff11_1111);
    assert_eq!(pixels[50 * 64 + 40], 0xff00_0000);
}

#[test]
fn round_trip_full_and_empty() {
    let full = accumulate(
        &GlyphTessellator::new(TextLayout::single_line(100.))
            .tessellate(&BoxGlyphs, "I")
            .unwrap(),
        64,
        128,
    );
    let covered = full.get(15, 50);
    let empty = full.get(40, 50);
    let dark = cpu::decode_pixel(FinalizeMode::Grayscale, covered, covered);
    let light = cpu::decode_pixel(FinalizeMode::Grayscale, empty, empty);
    for i in 0..3 {
        assert!(dark[i].abs() < 1e-3);
        assert!((light[i] - 1.0).abs() < 1e-3);
    }
}

#[test]
fn subpixel_decode_is_linear() {
    let patterns: [[f32; 5]; 3] = [
        [1.0, 1.0, 0.5, 0.0, 0.0],
        [0.0, 0.5, 1.0, 1.0, 0.5],
        [0.5, 0.0, 0.0, 0.5, 1.0],
    ];
    for a in patterns {
        for b in patterns {
            let mut blend = [0.0; 5];
            for i in 0..5 {
                blend[i] = 0.5 * (a[i] + b[i]);
            }
            let (ra, rb, rblend) = (
                cpu::subpixel_rgb(a),
                cpu::subpixel_rgb(b),
                cpu::subpixel_rgb(blend),
            );
            for i in 0..3 {
                assert!((rblend[i] - 0.5 * (ra[i] + rb[i])).abs() < 1e-6);
            }
        }
    }
}

fn gray_at(target: &CpuTarget, x: u32, y: u32) -> f32 {
    let px = target.get(x, y);
    cpu::decode_pixel(FinalizeMode::Grayscale, px, px)[0]
}

#[test]
fn convex_curve_adds_coverage() {
    let mut path = BezPath::new();
    path.move_to((100., 100.));
    path.quad_to((200., 100.), (200., 200.));
    path.line_to((100., 200.));
    path.close_path();
    let mut meshes = GlyphMeshes::new();
    meshes.append_path(&path).unwrap();

    let target = accumulate(&meshes, 256, 256);
    // Under the chord, fan only.
    assert_eq!(gray_at(&target, 120, 180), 0.0);
    // Between chord and curve, correction only.
    assert_eq!(gray_at(&target, 189, 179), 0.0);
    // Beyond the curve, towards the control point.
    assert_eq!(gray_at(&target, 189, 109), 1.0);
}

#[test]
fn concave_curve_removes_coverage() {
    let mut path = BezPath::new();
    path.move_to((100., 100.));
    path.line_to((200., 100.));
    path.line_to((200., 200.));
    path.line_to((100., 200.));
    path.quad_to((150., 150.), (100., 100.));
    path.close_path();
    let mut meshes = GlyphMeshes::new();
    meshes.append_path(&path).unwrap();

    let target = accumulate(&meshes, 256, 256);
    // Between chord and curve, covered by both meshes and therefore empty.
    assert_eq!(gray_at(&target, 109, 149), 1.0);
    // Inside the glyph past the curve.
    assert_eq!(gray_at(&target, 139, 149), 0.0);
    assert_eq!(gray_at(&target, 180, 120), 0.0);

    // Without the correction the chord is used.
    let scheme = SampleScheme::new(256, 256);
    let mut faceted = CpuTarget::new(256, 256);
    let config = RenderConfig {
        show_curves: false,
        ..RenderConfig::default()
    };
    cpu::accumulate(&mut faceted, &meshes, &scheme, &config);
    assert_eq!(gray_at(&faceted, 109, 149), 0.0);
}

#[test]
fn every_layout_line_is_drawn() {
    let mut tessellator = GlyphTessellator::new(TextLayout::default());
    let meshes = tessellator.tessellate(&BoxGlyphs, "I").unwrap();
    let target = accumulate(&meshes, 256, 1000);
    let layout = TextLayout::default();
    for line in layout.lines() {
        // Near the top-left corner of each box, away from the fan diagonal.
        let size = f64::from(line.font_size);
        let x = (line.baseline.x + 0.05 * size) as u32;
        let y = (line.baseline.y - 0.6 * size) as u32;
        assert_eq!(gray_at(&target, x, y), 0.0, "line at {:?}", line.baseline);
    }
}
