// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The finalize pass, decoding packed coverage into the output texture.

use std::num::NonZeroU64;

use peniko::Color;
use sixfold_encoding::{FinalizeMode, FinalizeUniform};
use wgpu::util::DeviceExt;
use wgpu::{BindGroupLayout, Device, RenderPipeline, TextureFormat, TextureView};

use crate::shaders::create_shader_module;
use crate::{AccumulationTarget, Result};

/// Draws a full-screen quad which decodes an [`AccumulationTarget`].
///
/// The output is multiplied onto the clear colour, so coverage darkens the background.
pub struct FinalizePass {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    format: TextureFormat,
}

impl FinalizePass {
    pub fn new(device: &Device, format: TextureFormat) -> Result<Self> {
        let module = create_shader_module(device, &sixfold_shaders::FINALIZE)?;
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sixfold finalize"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(size_of::<FinalizeUniform>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sixfold finalize"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        // dst * src
        let multiply = |dst_factor| wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor,
            operation: wgpu::BlendOperation::Add,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sixfold finalize"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: multiply(wgpu::BlendFactor::Src),
                        alpha: multiply(wgpu::BlendFactor::SrcAlpha),
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        Ok(Self {
            pipeline,
            bind_group_layout,
            format,
        })
    }

    /// Format of the textures this pass renders into.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Clears `target` to `background` and multiplies the decoded coverage of `source` onto it.
    ///
    /// Each call binds its own uniform buffer, so several calls may be recorded
    /// into one encoder with different modes.
    pub fn render(
        &self,
        device: &Device,
        encoder: &mut wgpu::CommandEncoder,
        source: &AccumulationTarget,
        target: &TextureView,
        mode: FinalizeMode,
        background: Color,
    ) {
        let uniform = FinalizeUniform::new(mode, source.width(), source.height());
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sixfold finalize uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sixfold finalize"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(source.view()),
                },
            ],
        });
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sixfold finalize"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(background)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..4, 0..1);
    }
}

fn clear_color(background: Color) -> wgpu::Color {
    let [r, g, b, a] = background.components;
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}
