// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sixfold renders text with [`wgpu`] by rasterizing glyph outlines directly on the GPU.
//!
//! Every glyph contour is drawn as a triangle fan, with quadratic curves replaced by
//! their chords, plus one correction triangle per curve whose fragment stage keeps
//! only the region between chord and curve. Overlapping triangles are resolved by
//! parity: each of six sub-pixel samples owns one bit of an `Rgba8Unorm` texel, and
//! additive blending flips it every time the sample is covered.
//!
//! Rendering takes two passes:
//!
//! - [`AccumulationPass`] draws both meshes once per sample into an offscreen
//!   [`AccumulationTarget`], with that sample's sub-pixel projection and colour.
//! - [`FinalizePass`] reads each texel and its right neighbour, decodes the six
//!   bits and writes dark-on-light coverage according to a [`FinalizeMode`].
//!
//! [`Renderer`] combines both with a [`GlyphTessellator`]:
//!
//! ```ignore
//! let mut renderer = Renderer::new(&device, RendererOptions::default())?;
//! renderer.resize(&device, &queue, width, height)?;
//! let font = SkrifaOutlines::new(&font_data)?;
//! renderer.set_text(&device, &font, "Hello")?;
//! renderer.render_to_texture(&device, &queue, &view, &RenderConfig::new(FinalizeMode::Subpixel))?;
//! ```

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    clippy::cast_possible_truncation,
    reason = "Deferred, only apply in some feature sets so not expect"
)]

mod accumulate;
mod finalize;
mod shaders;

pub mod util;

pub use accumulate::{AccumulationPass, AccumulationTarget, MeshStats, ACCUMULATION_FORMAT};
pub use finalize::FinalizePass;

pub use sixfold_encoding::{
    FinalizeMode, GlyphMeshes, GlyphTessellator, OutlineError, OutlineSource, RenderConfig,
    SampleScheme, TessellationError, TextLayout, UiToggles,
};

#[cfg(feature = "skrifa")]
pub use sixfold_encoding::SkrifaOutlines;

/// Styling and composition primitives.
pub use peniko;
/// 2D geometry, with a focus on curves.
pub use peniko::kurbo;

pub use wgpu;

use peniko::color::palette;
use peniko::Color;
use thiserror::Error;
use wgpu::{Device, Queue, TextureFormat, TextureView};

/// Errors that can occur in Sixfold.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// There is no available device.
    #[error("Couldn't find suitable device")]
    NoCompatibleDevice,
    /// A shader was rejected before reaching the GPU.
    #[error("Failed to compile shader {name}:\n{message}")]
    ShaderCompilation { name: &'static str, message: String },
    /// The accumulation target can't be created at the requested size.
    #[error("Can't allocate a {width}x{height} render target (maximum dimension {max})")]
    FramebufferAllocation { width: u32, height: u32, max: u32 },
    /// Rendering was requested before the first [`Renderer::resize`].
    #[error("Render target has not been sized yet")]
    ViewportNotConfigured,
    #[error(transparent)]
    Tessellation(#[from] TessellationError),
    /// Failed to async map a buffer.
    /// See [`wgpu::BufferAsyncError`] for more information.
    #[error("Failed to async map a buffer")]
    BufferAsync(#[from] wgpu::BufferAsyncError),
    /// Waiting for the device failed.
    #[error("Failed to poll device")]
    DevicePoll(#[from] wgpu::PollError),
    /// The device was lost before a readback completed.
    #[error("Readback channel closed before the buffer was mapped")]
    ReadbackChannelClosed,
    #[error("Readback of {0:?} textures is not supported")]
    UnsupportedReadbackFormat(TextureFormat),
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

/// Options which are set at renderer creation time, used in [`Renderer::new`].
#[derive(Clone, Debug)]
pub struct RendererOptions {
    /// Format of the textures [`Renderer::render_to_texture`] draws into.
    pub target_format: TextureFormat,
    /// Font sizes and placement of the rendered lines.
    pub layout: TextLayout,
    /// Colour the glyph coverage is multiplied onto.
    pub background: Color,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            target_format: TextureFormat::Rgba8Unorm,
            layout: TextLayout::default(),
            background: palette::css::WHITE,
        }
    }
}

/// Renders a string of text into a texture.
pub struct Renderer {
    options: RendererOptions,
    tessellator: GlyphTessellator,
    accumulate: AccumulationPass,
    finalize: FinalizePass,
    /// The last string whose meshes were uploaded.
    text: Option<String>,
}

static_assertions::assert_impl_all!(Renderer: Send);

impl Renderer {
    /// Creates a new renderer for the specified device.
    pub fn new(device: &Device, options: RendererOptions) -> Result<Self> {
        let accumulate = AccumulationPass::new(device)?;
        let finalize = FinalizePass::new(device, options.target_format)?;
        Ok(Self {
            tessellator: GlyphTessellator::new(options.layout.clone()),
            options,
            accumulate,
            finalize,
            text: None,
        })
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Reallocates the accumulation target and the sample projections for a new viewport.
    pub fn resize(
        &mut self,
        device: &Device,
        queue: &Queue,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.accumulate.resize(device, queue, width, height)
    }

    /// Replaces the layout; the next [`set_text`](Self::set_text) tessellates again.
    pub fn set_layout(&mut self, layout: TextLayout) {
        self.tessellator.set_layout(layout.clone());
        self.options.layout = layout;
        self.text = None;
    }

    /// Tessellates `text` with outlines from `source` and uploads the meshes.
    ///
    /// Returns `false` without doing anything when `text` is the string drawn
    /// already. On error the previous meshes stay in place.
    pub fn set_text(
        &mut self,
        device: &Device,
        source: &impl OutlineSource,
        text: &str,
    ) -> Result<bool> {
        if self.text.as_deref() == Some(text) {
            return Ok(false);
        }
        let meshes = match self.tessellator.tessellate(source, text) {
            Ok(meshes) => meshes,
            Err(err) => {
                log::warn!("Keeping previous glyph meshes, {text:?} failed to tessellate: {err}");
                return Err(err.into());
            }
        };
        self.accumulate.set_glyph_geometry(device, &meshes);
        self.text = Some(text.to_owned());
        Ok(true)
    }

    /// The string whose meshes are currently uploaded.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Records both passes into `encoder`, finalizing into `view`.
    ///
    /// May be called more than once before the encoder is submitted, for example
    /// to finalize the same text into several views with different modes.
    ///
    /// `view` must have the format given as `target_format` in [`RendererOptions`].
    pub fn encode(
        &self,
        device: &Device,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        config: &RenderConfig,
    ) -> Result<()> {
        self.accumulate.render(encoder, config)?;
        let target = self
            .accumulate
            .target()
            .ok_or(Error::ViewportNotConfigured)?;
        self.finalize.render(
            device,
            encoder,
            target,
            view,
            config.mode,
            self.options.background,
        );
        Ok(())
    }

    /// Renders the current text into `view` and submits the work.
    ///
    /// The texture is assumed to have the size of the last [`resize`](Self::resize),
    /// the format given as `target_format` in [`RendererOptions`] and the
    /// [`wgpu::TextureUsages::RENDER_ATTACHMENT`] usage.
    pub fn render_to_texture(
        &self,
        device: &Device,
        queue: &Queue,
        view: &TextureView,
        config: &RenderConfig,
    ) -> Result<()> {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("sixfold render_to_texture"),
        });
        self.encode(device, &mut encoder, view, config)?;
        queue.submit(Some(encoder.finish()));
        Ok(())
    }

    /// The accumulation pass, for inspecting its target and meshes.
    pub fn accumulation(&self) -> &AccumulationPass {
        &self.accumulate
    }
}
