//! Vertex Layout Builder
//!
//! Consolidates a primitive's attribute accessors into the minimal set of
//! vertex buffer layouts.
//!
//! Attributes that live in the same buffer view within one stride of each
//! other are read as a single interleaved layout. Attributes that share a view
//! but sit further apart than a stride (planar blocks packed back to back) get
//! a separate layout each, keyed by attribute name.
//!
//! The output is canonical: attribute lists and the layout list are sorted by
//! shader location, so identical shapes always produce identical layouts
//! regardless of the order attributes were declared in.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::errors::{ResourceError, Result};
use crate::resources::accessor::Accessor;

/// Shader locations of the attribute semantics the builder understands.
pub const ATTR_LOC_POSITION: u32 = 0;
pub const ATTR_LOC_NORMAL: u32 = 1;
pub const ATTR_LOC_TANGENT: u32 = 2;
pub const ATTR_LOC_TEXCOORD_0: u32 = 3;
pub const ATTR_LOC_TEXCOORD_1: u32 = 4;
pub const ATTR_LOC_COLOR_0: u32 = 5;

#[must_use]
pub fn shader_location(semantic: &str) -> Option<u32> {
    match semantic {
        "POSITION" => Some(ATTR_LOC_POSITION),
        "NORMAL" => Some(ATTR_LOC_NORMAL),
        "TANGENT" => Some(ATTR_LOC_TANGENT),
        "TEXCOORD_0" => Some(ATTR_LOC_TEXCOORD_0),
        "TEXCOORD_1" => Some(ATTR_LOC_TEXCOORD_1),
        "COLOR_0" => Some(ATTR_LOC_COLOR_0),
        _ => None,
    }
}

/// An attribute semantic bound to a shader location and an accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAccessor {
    pub name: String,
    pub shader_location: u32,
    pub accessor: usize,
}

/// Keeps only the semantics with a known shader location.
#[must_use]
pub fn attribute_accessors(attributes: &BTreeMap<String, usize>) -> Vec<AttributeAccessor> {
    attributes
        .iter()
        .filter_map(|(name, &accessor)| {
            let Some(shader_location) = shader_location(name) else {
                log::warn!("Dropping attribute \"{name}\": no shader location");
                return None;
            };
            Some(AttributeAccessor {
                name: name.clone(),
                shader_location,
                accessor,
            })
        })
        .collect()
}

/// One vertex buffer slot: stride plus attributes relative to the binding point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferLayout {
    pub array_stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl BufferLayout {
    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    fn first_location(&self) -> u32 {
        self.attributes.first().map_or(u32::MAX, |a| a.shader_location)
    }
}

/// What gets bound to a vertex buffer slot at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBinding {
    /// Accessor whose range anchors the slot.
    pub accessor: usize,
    pub buffer_view: usize,
    /// Byte offset inside the buffer view's GPU buffer.
    pub offset: u64,
    /// `count * stride` of the anchoring accessor. Mesh build caps it at the
    /// end of the view.
    pub size: u64,
}

/// Output of [`build_vertex_layout`]. `layouts[i]` is bound from `bindings[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveLayout {
    pub layouts: Vec<BufferLayout>,
    pub bindings: Vec<VertexBinding>,
    /// Count of the POSITION accessor, zero when there is none.
    pub vertex_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LayoutKey<'a> {
    View(usize),
    Separate(&'a str),
}

struct PendingLayout {
    layout: BufferLayout,
    base_accessor: usize,
    base_offset: u64,
}

/// Builds the vertex buffer layouts of one primitive.
pub fn build_vertex_layout(attributes: &[AttributeAccessor], accessors: &[Accessor]) -> Result<PrimitiveLayout> {
    let mut ordered = attributes
        .iter()
        .map(|attr| {
            accessors
                .get(attr.accessor)
                .map(|accessor| (attr, accessor))
                .ok_or(ResourceError::IndexOutOfBounds {
                    context: "primitive.attributes",
                    index: attr.accessor,
                })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Stable: ties keep declaration order.
    ordered.sort_by_key(|(_, accessor)| accessor.byte_offset);

    let mut pending: Vec<PendingLayout> = Vec::with_capacity(ordered.len());
    let mut lookup: FxHashMap<LayoutKey<'_>, usize> = FxHashMap::default();
    let mut vertex_count = 0;

    for (attr, accessor) in ordered {
        let mut key = LayoutKey::View(accessor.buffer_view);

        if let Some(&slot) = lookup.get(&key) {
            let existing = &pending[slot];
            if accessor.byte_offset.abs_diff(existing.base_offset) >= existing.layout.array_stride {
                key = LayoutKey::Separate(&attr.name);
            }
        }

        let slot = if let Some(&slot) = lookup.get(&key) {
            let existing = &mut pending[slot];
            existing.base_offset = existing.base_offset.min(accessor.byte_offset);
            slot
        } else {
            pending.push(PendingLayout {
                layout: BufferLayout {
                    array_stride: accessor.stride,
                    attributes: Vec::new(),
                },
                base_accessor: attr.accessor,
                base_offset: accessor.byte_offset,
            });
            lookup.insert(key, pending.len() - 1);
            pending.len() - 1
        };

        if attr.name == "POSITION" {
            vertex_count = accessor.count;
        }

        pending[slot].layout.attributes.push(wgpu::VertexAttribute {
            format: accessor.vertex_format()?,
            offset: accessor.byte_offset,
            shader_location: attr.shader_location,
        });
    }

    for entry in &mut pending {
        for attribute in &mut entry.layout.attributes {
            attribute.offset -= entry.base_offset;
        }
        entry.layout.attributes.sort_by_key(|a| a.shader_location);
    }

    // Slot order is fixed by the lowest shader location in each layout.
    pending.sort_by_key(|entry| entry.layout.first_location());

    let mut layouts = Vec::with_capacity(pending.len());
    let mut bindings = Vec::with_capacity(pending.len());
    for entry in pending {
        let base = &accessors[entry.base_accessor];
        bindings.push(VertexBinding {
            accessor: entry.base_accessor,
            buffer_view: base.buffer_view,
            offset: entry.base_offset,
            size: base.byte_length,
        });
        layouts.push(entry.layout);
    }

    Ok(PrimitiveLayout {
        layouts,
        bindings,
        vertex_count,
    })
}
