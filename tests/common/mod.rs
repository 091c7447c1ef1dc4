//! Shared test helpers: a GLB byte writer and a recording fake backend.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ops::Range;

use myth_glb::renderer::backend::{RenderBackend, RenderPassEncoder, RenderPipelineRequest};

pub const FLOAT: u32 = 5126;
pub const UNSIGNED_SHORT: u32 = 5123;

/// Routes `log` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// GLB Writer
// ============================================================================

/// Writes a GLB container. The JSON chunk length is the raw text length;
/// padding to the binary chunk header is zero bytes.
pub fn glb_bytes(json: &str, bin: &[u8]) -> Vec<u8> {
    glb_bytes_with_header(0x4654_6C67, 2, 0x4E4F_534A, json, Some((0x004E_4942, bin)))
}

pub fn glb_bytes_with_header(
    magic: u32,
    version: u32,
    json_type: u32,
    json: &str,
    bin_chunk: Option<(u32, &[u8])>,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&magic.to_le_bytes());
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&json_type.to_le_bytes());
    out.extend_from_slice(json.as_bytes());
    while out.len() % 4 != 0 {
        out.push(0);
    }
    if let Some((bin_type, bin)) = bin_chunk {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&bin_type.to_le_bytes());
        out.extend_from_slice(bin);
    }
    let total = out.len() as u32;
    out[8..12].copy_from_slice(&total.to_le_bytes());
    out
}

/// `count` little-endian `f32` triples, filled with increasing values.
pub fn vec3_bytes(count: usize) -> Vec<u8> {
    (0..count * 3).flat_map(|i| (i as f32).to_le_bytes()).collect()
}

/// One scene, one identity node with mesh 0, one triangle with 3 positions.
pub fn single_triangle_json() -> String {
    serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "Main", "nodes": [0] }],
        "nodes": [{
            "name": "Triangle",
            "mesh": 0,
            "matrix": [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        }],
        "meshes": [{ "name": "Tri", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "accessors": [{ "bufferView": 0, "componentType": FLOAT, "count": 3, "type": "VEC3" }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
        "buffers": [{ "byteLength": 36 }]
    })
    .to_string()
}

// ============================================================================
// Fake Backend
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeBuffer {
    pub id: u32,
    pub label: String,
    pub size: usize,
    pub usage: wgpu::BufferUsages,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    next_id: Cell<u32>,
    pub buffers: RefCell<Vec<FakeBuffer>>,
    pub destroyed: RefCell<Vec<u32>>,
    pub bind_groups: Cell<u32>,
    pub pipelines: RefCell<Vec<String>>,
}

impl FakeBackend {
    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub fn buffers_with_label(&self, prefix: &str) -> Vec<FakeBuffer> {
        self.buffers
            .borrow()
            .iter()
            .filter(|b| b.label.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl RenderBackend for FakeBackend {
    type Buffer = FakeBuffer;
    type BindGroupLayout = u32;
    type BindGroup = u32;
    type ShaderModule = u32;
    type RenderPipeline = u32;

    fn create_buffer_init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> FakeBuffer {
        let buffer = FakeBuffer {
            id: self.next(),
            label: label.to_string(),
            size: contents.len(),
            usage,
        };
        self.buffers.borrow_mut().push(buffer.clone());
        buffer
    }

    fn destroy_buffer(&self, buffer: &FakeBuffer) {
        self.destroyed.borrow_mut().push(buffer.id);
    }

    fn create_uniform_bind_group(&self, _label: &str, _layout: &u32, _buffer: &FakeBuffer) -> u32 {
        self.bind_groups.set(self.bind_groups.get() + 1);
        self.next()
    }

    fn create_render_pipeline(&self, request: &RenderPipelineRequest<'_, Self>) -> u32 {
        self.pipelines.borrow_mut().push(request.label.to_string());
        self.next()
    }
}

// ============================================================================
// Recording Pass
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetPipeline(u32),
    SetBindGroup { index: u32, bind_group: u32 },
    SetVertexBuffer { slot: u32, buffer: u32, offset: u64, size: u64 },
    SetIndexBuffer { buffer: u32, format: wgpu::IndexFormat, offset: u64, size: u64 },
    Draw { vertices: Range<u32>, instances: Range<u32> },
    DrawIndexed { indices: Range<u32>, base_vertex: i32, instances: Range<u32> },
}

#[derive(Debug, Default)]
pub struct RecordingPass {
    pub commands: Vec<Command>,
}

impl RecordingPass {
    pub fn draws(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. } | Command::DrawIndexed { .. }))
            .collect()
    }

    pub fn index_bindings(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::SetIndexBuffer { .. }))
            .count()
    }

    pub fn vertex_bindings(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::SetVertexBuffer { .. }))
            .collect()
    }
}

impl RenderPassEncoder<FakeBackend> for RecordingPass {
    fn set_pipeline(&mut self, pipeline: &u32) {
        self.commands.push(Command::SetPipeline(*pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &u32) {
        self.commands.push(Command::SetBindGroup {
            index,
            bind_group: *bind_group,
        });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &FakeBuffer, offset: u64, size: u64) {
        self.commands.push(Command::SetVertexBuffer {
            slot,
            buffer: buffer.id,
            offset,
            size,
        });
    }

    fn set_index_buffer(&mut self, buffer: &FakeBuffer, format: wgpu::IndexFormat, offset: u64, size: u64) {
        self.commands.push(Command::SetIndexBuffer {
            buffer: buffer.id,
            format,
            offset,
            size,
        });
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.commands.push(Command::Draw { vertices, instances });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.commands.push(Command::DrawIndexed {
            indices,
            base_vertex,
            instances,
        });
    }
}
