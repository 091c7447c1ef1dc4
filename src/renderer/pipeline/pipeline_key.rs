//! Strongly-typed pipeline cache key.
//!
//! A [`PipelineKey`] is the structural signature of a primitive's pipeline:
//! shader modules and entry points, topology, strip index format, the
//! canonical vertex layouts, the bind group layout set, target formats and the
//! pipeline state taken from [`SceneSettings`]. Vertex layouts are canonicalized before they reach the
//! key, so attribute declaration order never splits an entry.

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::renderer::pipeline::vertex::BufferLayout;
use crate::renderer::settings::SceneSettings;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    /// `FxHasher` hash of the vertex shader module handle.
    pub vertex_module_id: u64,
    pub fragment_module_id: u64,
    pub vertex_entry_point: &'static str,
    pub fragment_entry_point: &'static str,
    pub topology: wgpu::PrimitiveTopology,
    /// Only set for strip topologies drawn with an index buffer.
    pub strip_index_format: Option<wgpu::IndexFormat>,
    pub vertex_layouts: Vec<BufferLayout>,
    /// One hash per bind group layout, in group order.
    pub bind_group_layout_ids: SmallVec<[u64; 4]>,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub cull_mode: Option<wgpu::Face>,
    pub front_face: wgpu::FrontFace,
    pub depth_write: bool,
    pub depth_compare: wgpu::CompareFunction,
    pub sample_count: u32,
}

impl PipelineKey {
    #[must_use]
    pub fn new<M: Hash, L: Hash>(
        vertex_module: &M,
        fragment_module: &M,
        topology: wgpu::PrimitiveTopology,
        index_format: Option<wgpu::IndexFormat>,
        vertex_layouts: Vec<BufferLayout>,
        bind_group_layouts: &[&L],
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        settings: &SceneSettings,
    ) -> Self {
        Self {
            vertex_module_id: fx_hash_key(vertex_module),
            fragment_module_id: fx_hash_key(fragment_module),
            vertex_entry_point: settings.vertex_entry_point,
            fragment_entry_point: settings.fragment_entry_point,
            topology,
            strip_index_format: if topology.is_strip() { index_format } else { None },
            vertex_layouts,
            bind_group_layout_ids: bind_group_layouts.iter().map(fx_hash_key).collect(),
            color_format,
            depth_format,
            cull_mode: settings.cull_mode,
            front_face: settings.front_face,
            depth_write: settings.depth_write,
            depth_compare: settings.depth_compare,
            sample_count: settings.sample_count,
        }
    }
}

/// Compute a `u64` hash of any `Hash`-able value using `FxHasher`.
#[inline]
pub fn fx_hash_key<K: Hash>(key: &K) -> u64 {
    let mut hasher = rustc_hash::FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}
