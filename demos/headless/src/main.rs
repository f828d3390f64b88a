// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sixfold::util::{read_texture_rgba8, RenderContext};
use sixfold::wgpu::{self, TextureDescriptor, TextureFormat, TextureUsages};
use sixfold::{
    FinalizeMode, RenderConfig, Renderer, RendererOptions, SkrifaOutlines, TextLayout, UiToggles,
};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    pollster::block_on(render(&args))
}

async fn render(args: &Args) -> Result<()> {
    let font_data = std::fs::read(&args.font)
        .with_context(|| format!("Couldn't read font file {:?}", args.font))?;
    let font = SkrifaOutlines::new(&font_data)?;

    let mut context = RenderContext::new();
    let device_id = context.device().await?;
    let device_handle = &context.devices[device_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;

    let layout = match args.size {
        Some(size) => TextLayout::single_line(size),
        None => TextLayout::default(),
    };
    let mut renderer = Renderer::new(
        device,
        RendererOptions {
            target_format: TextureFormat::Rgba8Unorm,
            layout,
            ..Default::default()
        },
    )?;
    let (width, height) = (args.width, args.height);
    renderer.resize(device, queue, width, height)?;
    renderer.set_text(device, &font, &args.text)?;

    let target = device.create_texture(&TextureDescriptor {
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
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    renderer.render_to_texture(device, queue, &view, &args.config())?;
    let pixels = read_texture_rgba8(device, queue, &target)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&args.out)?;
    let mut png_encoder = png::Encoder::new(BufWriter::new(file), width, height);
    png_encoder.set_color(png::ColorType::Rgba);
    png_encoder.set_depth(png::BitDepth::Eight);
    let mut writer = png_encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    println!("Wrote result ({width}x{height}) to {:?}", args.out);
    Ok(())
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// The packed accumulation texture
    Raw,
    /// One sample per pixel
    NoAa,
    Grayscale,
    Subpixel,
}

impl From<Mode> for FinalizeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => Self::Raw,
            Mode::NoAa => Self::NoAa,
            Mode::Grayscale => Self::Grayscale,
            Mode::Subpixel => Self::Subpixel,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name = "cargo run -p headless --")]
struct Args {
    /// TrueType font file with quadratic outlines
    font: PathBuf,
    /// The string to render
    #[arg(long, short, default_value = "Hello, world!")]
    text: String,
    #[arg(long, default_value_t = 1024)]
    width: u32,
    #[arg(long, default_value_t = 768)]
    height: u32,
    /// Draw a single line at this size instead of the default ladder of sizes
    #[arg(long)]
    size: Option<f32>,
    #[arg(long, short, value_enum, default_value_t = Mode::NoAa)]
    mode: Mode,
    /// Skip the rough fan mesh
    #[arg(long)]
    no_fan: bool,
    /// Skip the curve-correction mesh, leaving curved edges faceted
    #[arg(long)]
    no_curves: bool,
    /// Where to write the image
    #[arg(long, short, default_value_os_t = default_output())]
    out: PathBuf,
}

impl Args {
    fn config(&self) -> RenderConfig {
        let toggles = UiToggles {
            show_fan: !self.no_fan,
            show_curves: !self.no_curves,
            ..UiToggles::default()
        };
        RenderConfig {
            mode: self.mode.into(),
            ..RenderConfig::from_toggles(toggles)
        }
    }
}

fn default_output() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("outputs")
        .join("text.png")
}
