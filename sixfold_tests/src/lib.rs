// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sixfold tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
// Feel free to send a PR that solves one or more of these.
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::allow_attributes_without_reason
)]

use std::env;
use std::fs::File;
use std::io::{BufWriter, ErrorKind};
use std::path::Path;

use anyhow::{anyhow, Result};
use sixfold::kurbo::{BezPath, Point};
use sixfold::util::{read_texture_rgba8, RenderContext};
use sixfold::wgpu::{self, TextureFormat, TextureUsages};
use sixfold::{
    FinalizeMode, OutlineError, OutlineSource, RenderConfig, Renderer, RendererOptions,
    SampleScheme, TextLayout,
};
use sixfold_shaders::cpu::{self, CpuTarget};

/// Draws every character as a box `0.2 * size` wide and `0.7 * size` tall on the baseline.
pub struct BoxGlyphs;

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

/// Draws every character as a rounded diamond of four quadratic curves.
pub struct RoundGlyphs;

impl OutlineSource for RoundGlyphs {
    fn append_outline(
        &self,
        text: &str,
        font_size: f32,
        origin: Point,
        path: &mut BezPath,
    ) -> Result<(), OutlineError> {
        let size = f64::from(font_size);
        for (i, _) in text.chars().enumerate() {
            let (x0, y1) = (origin.x + i as f64 * 0.7 * size, origin.y);
            let (x1, y0) = (x0 + 0.6 * size, y1 - 0.6 * size);
            let (xm, ym) = ((x0 + x1) * 0.5, (y0 + y1) * 0.5);
            path.move_to((x0, ym));
            path.quad_to((x0, y0), (xm, y0));
            path.quad_to((x1, y0), (x1, ym));
            path.quad_to((x1, y1), (xm, y1));
            path.quad_to((x0, y1), (x0, ym));
            path.close_path();
        }
        Ok(())
    }
}

/// Draws a single cubic curve, which the tessellator rejects.
pub struct CubicGlyphs;

impl OutlineSource for CubicGlyphs {
    fn append_outline(
        &self,
        _: &str,
        font_size: f32,
        origin: Point,
        path: &mut BezPath,
    ) -> Result<(), OutlineError> {
        let size = f64::from(font_size);
        path.move_to(origin);
        path.curve_to(
            (origin.x, origin.y - size),
            (origin.x + size, origin.y - size),
            (origin.x + size, origin.y),
        );
        path.close_path();
        Ok(())
    }
}

pub struct TestParams {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub text: String,
    pub layout: TextLayout,
    pub config: RenderConfig,
}

impl TestParams {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            text: "I".into(),
            layout: TextLayout::single_line(100.),
            config: RenderConfig::default(),
        }
    }

    pub fn with_mode(mut self, mode: FinalizeMode) -> Self {
        self.config.mode = mode;
        self
    }
}

/// Readback of both passes, as RGBA8 rows.
pub struct RenderOutput {
    pub width: u32,
    pub height: u32,
    pub accumulation: Vec<u8>,
    pub pixels: Vec<u8>,
}

impl RenderOutput {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

pub fn render_sync(source: &impl OutlineSource, params: &TestParams) -> Result<RenderOutput> {
    pollster::block_on(render(source, params))
}

pub async fn render(source: &impl OutlineSource, params: &TestParams) -> Result<RenderOutput> {
    let mut context = RenderContext::new();
    let device_id = context.device().await?;
    let device_handle = &context.devices[device_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;
    let mut renderer = Renderer::new(
        device,
        RendererOptions {
            layout: params.layout.clone(),
            ..RendererOptions::default()
        },
    )?;
    renderer.resize(device, queue, params.width, params.height)?;
    renderer.set_text(device, source, &params.text)?;
    let target = create_target(device, params.width, params.height);
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    renderer.render_to_texture(device, queue, &view, &params.config)?;

    let accumulation = renderer
        .accumulation()
        .target()
        .ok_or_else(|| anyhow!("accumulation target was not allocated"))?;
    let output = RenderOutput {
        width: params.width,
        height: params.height,
        accumulation: read_texture_rgba8(device, queue, accumulation.texture())?,
        pixels: read_texture_rgba8(device, queue, &target)?,
    };
    write_debug_png(params, &output)?;
    Ok(output)
}

pub fn create_target(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Target texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TextureFormat::Rgba8Unorm,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// The accumulation target computed on the CPU, as RGBA8 rows.
pub fn cpu_accumulation(source: &impl OutlineSource, params: &TestParams) -> Result<Vec<u8>> {
    let mut tessellator = sixfold::GlyphTessellator::new(params.layout.clone());
    let meshes = tessellator.tessellate(source, &params.text)?;
    let scheme = SampleScheme::new(params.width, params.height);
    let mut target = CpuTarget::new(params.width, params.height);
    cpu::accumulate(&mut target, &meshes, &scheme, &params.config);
    Ok(target.to_rgba8())
}

/// Number of pixels whose bytes differ between two RGBA8 images.
pub fn count_differences(a: &[u8], b: &[u8]) -> usize {
    a.chunks_exact(4)
        .zip(b.chunks_exact(4))
        .filter(|(x, y)| x != y)
        .count()
}

/// Writes the output to `debug_outputs/<name>.png` when `SIXFOLD_DEBUG_TEST` names this test
/// (or is `all`), and removes stale outputs otherwise.
fn write_debug_png(params: &TestParams, output: &RenderOutput) -> Result<()> {
    let out_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("debug_outputs")
        .join(&params.name)
        .with_extension("png");
    let enabled = env::var("SIXFOLD_DEBUG_TEST")
        .is_ok_and(|value| value == "all" || value.split(',').any(|name| name == params.name));
    if !enabled {
        return match std::fs::remove_file(&out_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        };
    }
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&out_path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), output.width, output.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&output.pixels)?;
    writer.finish()?;
    println!(
        "Wrote debug result ({}x{}) to {out_path:?}",
        output.width, output.height
    );
    Ok(())
}
