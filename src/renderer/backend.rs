//! GPU backend seam.
//!
//! The scene builder never talks to `wgpu` directly. It goes through
//! [`RenderBackend`] for resource creation and [`RenderPassEncoder`] for
//! recording draws, which keeps layout building and traversal testable without
//! a device. [`WgpuBackend`] is the production implementation.

use std::hash::Hash;
use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::renderer::pipeline::pipeline_key::PipelineKey;
use crate::renderer::pipeline::vertex::BufferLayout;
use crate::renderer::settings::SceneSettings;

/// Everything needed to create one render pipeline.
pub struct RenderPipelineRequest<'a, B: RenderBackend + ?Sized> {
    pub label: &'a str,
    pub key: &'a PipelineKey,
    pub vertex_module: &'a B::ShaderModule,
    pub fragment_module: &'a B::ShaderModule,
    pub bind_group_layouts: &'a [&'a B::BindGroupLayout],
    pub settings: &'a SceneSettings,
}

/// Resource creation on one device.
///
/// Creation failures (device loss, validation) are reported by the backend's
/// own error channel and are not retried here.
pub trait RenderBackend {
    type Buffer;
    type BindGroupLayout: Hash;
    type BindGroup;
    type ShaderModule: Hash;
    type RenderPipeline: Clone;

    /// Creates a buffer initialised with `contents`.
    fn create_buffer_init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> Self::Buffer;

    fn destroy_buffer(&self, buffer: &Self::Buffer);

    /// Creates a bind group with `buffer` bound whole at binding 0.
    fn create_uniform_bind_group(
        &self,
        label: &str,
        layout: &Self::BindGroupLayout,
        buffer: &Self::Buffer,
    ) -> Self::BindGroup;

    fn create_render_pipeline(&self, request: &RenderPipelineRequest<'_, Self>) -> Self::RenderPipeline;
}

/// Draw recording for a render pass.
pub trait RenderPassEncoder<B: RenderBackend> {
    fn set_pipeline(&mut self, pipeline: &B::RenderPipeline);

    fn set_bind_group(&mut self, index: u32, bind_group: &B::BindGroup);

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &B::Buffer, offset: u64, size: u64);

    fn set_index_buffer(&mut self, buffer: &B::Buffer, format: wgpu::IndexFormat, offset: u64, size: u64);

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);
}

// ─── wgpu ────────────────────────────────────────────────────────────────────

/// Device and queue of a `wgpu` context.
pub struct WgpuBackend {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl WgpuBackend {
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Creates a vertex-stage uniform layout suitable for the world-matrix group.
    #[must_use]
    pub fn create_world_bind_group_layout(&self) -> wgpu::BindGroupLayout {
        self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("World Matrix Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(64),
                },
                count: None,
            }],
        })
    }
}

impl RenderBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type BindGroupLayout = wgpu::BindGroupLayout;
    type BindGroup = wgpu::BindGroup;
    type ShaderModule = wgpu::ShaderModule;
    type RenderPipeline = wgpu::RenderPipeline;

    fn create_buffer_init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        })
    }

    fn destroy_buffer(&self, buffer: &wgpu::Buffer) {
        buffer.destroy();
    }

    fn create_uniform_bind_group(
        &self,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    fn create_render_pipeline(&self, request: &RenderPipelineRequest<'_, Self>) -> wgpu::RenderPipeline {
        let key = request.key;
        let settings = request.settings;

        let bind_group_layouts: Vec<Option<&wgpu::BindGroupLayout>> =
            request.bind_group_layouts.iter().copied().map(Some).collect();
        let layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(request.label),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let vertex_buffers: Vec<wgpu::VertexBufferLayout<'_>> =
            key.vertex_layouts.iter().map(BufferLayout::as_wgpu).collect();

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(request.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: request.vertex_module,
                entry_point: Some(settings.vertex_entry_point),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: request.fragment_module,
                entry_point: Some(settings.fragment_entry_point),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: key.strip_index_format,
                front_face: key.front_face,
                cull_mode: key.cull_mode,
                ..Default::default()
            },
            depth_stencil: key.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: Some(key.depth_write),
                depth_compare: Some(key.depth_compare),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: key.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        })
    }
}

impl RenderPassEncoder<WgpuBackend> for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline);
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &wgpu::BindGroup) {
        wgpu::RenderPass::set_bind_group(self, index, bind_group, &[]);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer, offset: u64, size: u64) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.slice(offset..offset + size));
    }

    fn set_index_buffer(&mut self, buffer: &wgpu::Buffer, format: wgpu::IndexFormat, offset: u64, size: u64) {
        wgpu::RenderPass::set_index_buffer(self, buffer.slice(offset..offset + size), format);
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, instances);
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        wgpu::RenderPass::draw_indexed(self, indices, base_vertex, instances);
    }
}
