// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The accumulation pass and its offscreen target.

use std::num::NonZeroU64;

use sixfold_encoding::{
    CurveVertex, FanVertex, GlyphMeshes, RenderConfig, SampleScheme, SampleUniform, SAMPLE_COUNT,
};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, Texture, TextureFormat, TextureView};

use crate::shaders::create_shader_module;
use crate::{Error, Result};

/// Format of the accumulation target. The sample weights of 1 and 16 assume 8 bits per channel.
pub const ACCUMULATION_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// The offscreen texture receiving the packed coverage of all sample draws.
pub struct AccumulationTarget {
    texture: Texture,
    view: TextureView,
    width: u32,
    height: u32,
}

impl AccumulationTarget {
    /// Allocates a target, failing for empty sizes and sizes over the device limit.
    pub fn new(device: &Device, width: u32, height: u32) -> Result<Self> {
        let max = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(Error::FramebufferAllocation { width, height, max });
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sixfold accumulation target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            format: ACCUMULATION_FORMAT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            texture,
            view,
            width,
            height,
        })
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Sizes of the meshes currently uploaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub fan_vertices: u32,
    pub fan_indices: u32,
    pub curve_vertices: u32,
}

#[derive(Default)]
struct MeshBuffers {
    fan_vertices: Option<Buffer>,
    fan_indices: Option<Buffer>,
    curve_vertices: Option<Buffer>,
    stats: MeshStats,
}

/// Draws the glyph meshes once per sample into an [`AccumulationTarget`].
pub struct AccumulationPass {
    fan_pipeline: RenderPipeline,
    curve_pipeline: RenderPipeline,
    /// One [`SampleUniform`] per sample, `uniform_stride` bytes apart.
    uniforms: Buffer,
    bind_group: BindGroup,
    uniform_stride: u64,
    target: Option<AccumulationTarget>,
    scheme: Option<SampleScheme>,
    meshes: MeshBuffers,
}

fn uniform_stride(device: &Device) -> u64 {
    let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);
    (size_of::<SampleUniform>() as u64).next_multiple_of(align)
}

impl AccumulationPass {
    pub fn new(device: &Device) -> Result<Self> {
        let module = create_shader_module(device, &sixfold_shaders::ACCUMULATE)?;
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sixfold accumulate"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(size_of::<SampleUniform>() as u64),
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sixfold accumulate"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let fan_attributes = wgpu::vertex_attr_array![0 => Float32x2];
        let fan_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &module,
            "fan",
            wgpu::VertexBufferLayout {
                array_stride: size_of::<FanVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &fan_attributes,
            },
        );
        let curve_attributes = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];
        let curve_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &module,
            "curve",
            wgpu::VertexBufferLayout {
                array_stride: size_of::<CurveVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &curve_attributes,
            },
        );

        let uniform_stride = uniform_stride(device);
        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sixfold sample uniforms"),
            size: uniform_stride * SAMPLE_COUNT as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sixfold accumulate"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniforms,
                    offset: 0,
                    size: NonZeroU64::new(size_of::<SampleUniform>() as u64),
                }),
            }],
        });

        Ok(Self {
            fan_pipeline,
            curve_pipeline,
            uniforms,
            bind_group,
            uniform_stride,
            target: None,
            scheme: None,
            meshes: MeshBuffers::default(),
        })
    }

    /// Reallocates the target and recomputes the sample projections.
    ///
    /// Does nothing if the target already has this size.
    pub fn resize(
        &mut self,
        device: &Device,
        queue: &Queue,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if self
            .target
            .as_ref()
            .is_some_and(|t| t.width == width && t.height == height)
        {
            return Ok(());
        }
        let target = AccumulationTarget::new(device, width, height)?;
        let scheme = SampleScheme::new(width, height);
        let mut data = vec![0_u8; self.uniforms.size() as usize];
        for (i, uniform) in scheme.uniforms().iter().enumerate() {
            let offset = i * self.uniform_stride as usize;
            data[offset..offset + size_of::<SampleUniform>()]
                .copy_from_slice(bytemuck::bytes_of(uniform));
        }
        queue.write_buffer(&self.uniforms, 0, &data);
        log::debug!("Accumulation target resized to {width}x{height}");
        self.target = Some(target);
        self.scheme = Some(scheme);
        Ok(())
    }

    /// Uploads new meshes, replacing the previous ones.
    pub fn set_glyph_geometry(&mut self, device: &Device, meshes: &GlyphMeshes) {
        let init = |label, contents: &[u8], usage| {
            (!contents.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage,
                })
            })
        };
        let fan = &meshes.fan;
        let curves = &meshes.curves;
        self.meshes = MeshBuffers {
            fan_vertices: init(
                "sixfold fan vertices",
                fan.vertex_bytes(),
                wgpu::BufferUsages::VERTEX,
            ),
            fan_indices: init(
                "sixfold fan indices",
                fan.index_bytes(),
                wgpu::BufferUsages::INDEX,
            ),
            curve_vertices: init(
                "sixfold curve vertices",
                curves.vertex_bytes(),
                wgpu::BufferUsages::VERTEX,
            ),
            stats: MeshStats {
                fan_vertices: fan.vertex_count() as u32,
                fan_indices: fan.index_count() as u32,
                curve_vertices: curves.vertex_count() as u32,
            },
        };
        log::debug!("Uploaded glyph meshes: {:?}", self.meshes.stats);
    }

    /// Clears the target to opaque black and draws every enabled mesh once per
    /// sample, all fan draws before all curve draws.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, config: &RenderConfig) -> Result<()> {
        let target = self.target.as_ref().ok_or(Error::ViewportNotConfigured)?;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sixfold accumulate"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        let stats = self.meshes.stats;
        if let (true, Some(vertices), Some(indices)) = (
            config.show_fan,
            &self.meshes.fan_vertices,
            &self.meshes.fan_indices,
        ) {
            pass.set_pipeline(&self.fan_pipeline);
            pass.set_vertex_buffer(0, vertices.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
            for offset in self.sample_offsets() {
                pass.set_bind_group(0, &self.bind_group, &[offset]);
                pass.draw_indexed(0..stats.fan_indices, 0, 0..1);
            }
        }
        if let (true, Some(vertices)) = (config.show_curves, &self.meshes.curve_vertices) {
            pass.set_pipeline(&self.curve_pipeline);
            pass.set_vertex_buffer(0, vertices.slice(..));
            for offset in self.sample_offsets() {
                pass.set_bind_group(0, &self.bind_group, &[offset]);
                pass.draw(0..stats.curve_vertices, 0..1);
            }
        }
        Ok(())
    }

    /// Dynamic offsets of the sample uniforms, in draw order.
    fn sample_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        (0..SAMPLE_COUNT as u64).map(|i| (i * self.uniform_stride) as u32)
    }

    /// The target written by [`render`](Self::render), once sized.
    pub fn target(&self) -> Option<&AccumulationTarget> {
        self.target.as_ref()
    }

    /// The sample projections of the current size.
    pub fn sample_scheme(&self) -> Option<&SampleScheme> {
        self.scheme.as_ref()
    }

    pub fn mesh_stats(&self) -> MeshStats {
        self.meshes.stats
    }
}

fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    mesh: &str,
    buffer: wgpu::VertexBufferLayout<'_>,
) -> RenderPipeline {
    // One + One, so every covered draw adds its sample's weight.
    let additive = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    let vs_entry = format!("vs_{mesh}");
    let fs_entry = format!("fs_{mesh}");
    let label = format!("sixfold accumulate {mesh}");
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some(&vs_entry),
            buffers: &[buffer],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(&fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: ACCUMULATION_FORMAT,
                blend: Some(wgpu::BlendState {
                    color: additive,
                    alpha: additive,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
