//! Meshes and primitives.
//!
//! Building a primitive resolves its topology and index format, drops
//! attributes without a shader location, consolidates the rest into vertex
//! buffer layouts and registers usage against every buffer view it reads.
//! Binding sizes are capped at the end of their view.

use crate::assets::document::{MeshDef, PrimitiveDef};
use crate::errors::{ResourceError, Result};
use crate::renderer::pipeline::vertex::{
    AttributeAccessor, PrimitiveLayout, attribute_accessors, build_vertex_layout,
};
use crate::resources::accessor::{Accessor, index_format};
use crate::resources::buffer::BufferViewManager;

/// glTF `TRIANGLES`, used when a primitive has no `mode`.
pub const DEFAULT_MODE: u32 = 4;

/// Maps a primitive `mode` to a render topology.
pub fn topology_from_mode(mode: u32) -> Result<wgpu::PrimitiveTopology> {
    use wgpu::PrimitiveTopology as T;
    match mode {
        0 => Ok(T::PointList),
        1 => Ok(T::LineList),
        3 => Ok(T::LineStrip),
        4 => Ok(T::TriangleList),
        5 => Ok(T::TriangleStrip),
        other => Err(ResourceError::UnsupportedTopology(other).into()),
    }
}

/// Index buffer binding of an indexed primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBinding {
    pub accessor: usize,
    pub buffer_view: usize,
    pub format: wgpu::IndexFormat,
    pub offset: u64,
    pub size: u64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub topology: wgpu::PrimitiveTopology,
    pub indices: Option<IndexBinding>,
    pub attributes: Vec<AttributeAccessor>,
    pub layout: PrimitiveLayout,
}

impl Primitive {
    pub fn build<T>(def: &PrimitiveDef, accessors: &[Accessor], views: &mut BufferViewManager<T>) -> Result<Self> {
        let topology = topology_from_mode(def.mode.unwrap_or(DEFAULT_MODE))?;

        let indices = match def.indices {
            Some(index) => {
                let accessor = accessors.get(index).ok_or(ResourceError::IndexOutOfBounds {
                    context: "primitive.indices",
                    index,
                })?;
                let format = index_format(accessor.vertex_format()?)?;
                views.register_usage(accessor.buffer_view, wgpu::BufferUsages::INDEX)?;
                let size = views.bound_size(accessor.buffer_view, accessor.byte_offset, accessor.byte_length)?;
                Some(IndexBinding {
                    accessor: index,
                    buffer_view: accessor.buffer_view,
                    format,
                    offset: accessor.byte_offset,
                    size,
                    count: accessor.count,
                })
            }
            None => None,
        };

        let attributes = attribute_accessors(&def.attributes);
        let mut layout = build_vertex_layout(&attributes, accessors)?;
        for binding in &mut layout.bindings {
            views.register_usage(binding.buffer_view, wgpu::BufferUsages::VERTEX)?;
            binding.size = views.bound_size(binding.buffer_view, binding.offset, binding.size)?;
        }

        Ok(Self {
            topology,
            indices,
            attributes,
            layout,
        })
    }

    #[inline]
    #[must_use]
    pub fn index_format(&self) -> Option<wgpu::IndexFormat> {
        self.indices.map(|i| i.format)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    pub fn build<T>(def: &MeshDef, accessors: &[Accessor], views: &mut BufferViewManager<T>) -> Result<Self> {
        let primitives = def
            .primitives
            .iter()
            .map(|primitive| Primitive::build(primitive, accessors, views))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: def.name.clone(),
            primitives,
        })
    }
}
