// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use sixfold_encoding::kurbo::{Affine, Point};
use sixfold_encoding::{
    ChannelSlot, CurveVertex, FanVertex, GlyphMeshes, RenderConfig, SampleScheme,
};

/// Value of every pixel after the clear: opaque black.
const CLEAR: u32 = 0xff00_0000;

/// An RGBA8 render target, one `u32` per pixel with red in the low byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuTarget {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl CpuTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![CLEAR; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// The pixels as bytes, in the layout of an `Rgba8Unorm` texture.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.to_le_bytes()).collect()
    }

    fn clear(&mut self) {
        self.pixels.fill(CLEAR);
    }

    /// One + One blending on an unorm channel saturates at 255.
    fn add(&mut self, x: u32, y: u32, slot: ChannelSlot) {
        let px = &mut self.pixels[(y * self.width + x) as usize];
        let mut bytes = px.to_le_bytes();
        let ch = slot.channel as usize;
        bytes[ch] = bytes[ch].saturating_add(slot.weight);
        *px = u32::from_le_bytes(bytes);
    }
}

/// Pixel-space position of `p` after the sample projection, with y down.
fn to_framebuffer(transform: Affine, p: [f32; 2], width: f64, height: f64) -> Point {
    let ndc = transform * Point::new(f64::from(p[0]), f64::from(p[1]));
    Point::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
}

fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// For a triangle of positive `edge` area, with y down.
fn is_top_left(a: Point, b: Point) -> bool {
    (a.y == b.y && b.x > a.x) || b.y < a.y
}

fn covers(w: f64, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

/// Calls `shade` with the barycentric weights of every pixel centre covered by the triangle.
fn rasterize(
    width: u32,
    height: u32,
    mut v: [Point; 3],
    mut shade: impl FnMut(u32, u32, [f64; 3]),
) {
    let mut area = edge(v[0], v[1], v[2]);
    if area == 0.0 {
        return;
    }
    let swapped = area < 0.0;
    if swapped {
        v.swap(1, 2);
        area = -area;
    }
    let min_x = v.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = v.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = v.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = v.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let x0 = (min_x - 0.5).ceil().max(0.0) as u32;
    let x1 = ((max_x - 0.5).floor() + 1.0).clamp(0.0, f64::from(width)) as u32;
    let y0 = (min_y - 0.5).ceil().max(0.0) as u32;
    let y1 = ((max_y - 0.5).floor() + 1.0).clamp(0.0, f64::from(height)) as u32;
    let tl = [
        is_top_left(v[1], v[2]),
        is_top_left(v[2], v[0]),
        is_top_left(v[0], v[1]),
    ];
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let w = [edge(v[1], v[2], p), edge(v[2], v[0], p), edge(v[0], v[1], p)];
            if covers(w[0], tl[0]) && covers(w[1], tl[1]) && covers(w[2], tl[2]) {
                let mut bary = [w[0] / area, w[1] / area, w[2] / area];
                if swapped {
                    bary.swap(1, 2);
                }
                shade(x, y, bary);
            }
        }
    }
}

fn draw_fan(
    target: &mut CpuTarget,
    vertices: &[FanVertex],
    tri: [u16; 3],
    transform: Affine,
    slot: ChannelSlot,
) {
    let (w, h) = (f64::from(target.width), f64::from(target.height));
    let mut v = [Point::ZERO; 3];
    for i in 0..3 {
        v[i] = to_framebuffer(transform, vertices[tri[i] as usize].pos, w, h);
    }
    let (width, height) = (target.width, target.height);
    rasterize(width, height, v, |x, y, _| target.add(x, y, slot));
}

fn draw_curve(
    target: &mut CpuTarget,
    tri: [CurveVertex; 3],
    transform: Affine,
    slot: ChannelSlot,
) {
    let (w, h) = (f64::from(target.width), f64::from(target.height));
    let mut v = [Point::ZERO; 3];
    for i in 0..3 {
        v[i] = to_framebuffer(transform, tri[i].pos, w, h);
    }
    let (width, height) = (target.width, target.height);
    rasterize(width, height, v, |x, y, bary| {
        let mut st = [0.0_f32; 2];
        for i in 0..3 {
            st[0] += bary[i] as f32 * tri[i].st[0];
            st[1] += bary[i] as f32 * tri[i].st[1];
        }
        if st[0] * st[0] > st[1] {
            return;
        }
        target.add(x, y, slot);
    });
}

/// Software version of the accumulation pass.
///
/// `target` is cleared first, then every enabled mesh is drawn once per sample,
/// all fan draws before all curve draws.
pub fn accumulate(
    target: &mut CpuTarget,
    meshes: &GlyphMeshes,
    scheme: &SampleScheme,
    config: &RenderConfig,
) {
    target.clear();
    if config.show_fan {
        for sample in scheme.samples() {
            for tri in meshes.fan.triangles() {
                draw_fan(target, meshes.fan.vertices(), tri, sample.transform, sample.slot);
            }
        }
    }
    if config.show_curves {
        for sample in scheme.samples() {
            for tri in meshes.curves.triangles() {
                draw_curve(target, tri, sample.transform, sample.slot);
            }
        }
    }
}
