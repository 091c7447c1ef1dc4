//! Accessor resolution.
//!
//! Turns raw accessor definitions into typed descriptions with derived sizes:
//! tight element size, effective stride, byte length and vertex format.

use wgpu::VertexFormat;

use crate::assets::document::{AccessorDef, BufferViewDef};
use crate::errors::{ResourceError, Result};

/// Numeric type of a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
    F64,
}

impl ComponentType {
    /// Maps a glTF component type code.
    pub fn from_code(code: u32) -> Result<Self> {
        let ty = match code {
            5120 => Self::I8,
            5121 => Self::U8,
            5122 => Self::I16,
            5123 => Self::U16,
            5125 => Self::U32,
            5126 => Self::F32,
            5130 => Self::F64,
            other => return Err(ResourceError::UnsupportedComponentType(other).into()),
        };
        Ok(ty)
    }

    #[must_use]
    pub const fn byte_size(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::I8 => 5120,
            Self::U8 => 5121,
            Self::I16 => 5122,
            Self::U16 => 5123,
            Self::U32 => 5125,
            Self::F32 => 5126,
            Self::F64 => 5130,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::I8 => "sint8",
            Self::U8 => "uint8",
            Self::I16 => "sint16",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }
}

/// Shape of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn from_tag(tag: &str) -> Result<Self> {
        let ty = match tag {
            "SCALAR" => Self::Scalar,
            "VEC2" => Self::Vec2,
            "VEC3" => Self::Vec3,
            "VEC4" => Self::Vec4,
            "MAT2" => Self::Mat2,
            "MAT3" => Self::Mat3,
            "MAT4" => Self::Mat4,
            other => return Err(ResourceError::UnknownElementType(other.to_string()).into()),
        };
        Ok(ty)
    }

    #[must_use]
    pub const fn components(self) -> u32 {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// A resolved accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub buffer_view: usize,
    pub component_type: ComponentType,
    pub element_type: ElementType,
    pub normalized: bool,
    pub count: u32,
    /// Offset relative to the start of the owning buffer view.
    pub byte_offset: u64,
    /// `components * component size`, without padding.
    pub element_size: u64,
    /// Never smaller than `element_size`.
    pub stride: u64,
    /// `count * stride`.
    pub byte_length: u64,
}

impl Accessor {
    /// Resolves one accessor against its owning buffer view.
    pub fn resolve(def: &AccessorDef, view: &BufferViewDef) -> Result<Self> {
        let component_type = ComponentType::from_code(def.component_type)?;
        let element_type = ElementType::from_tag(&def.element_type)?;

        let element_size = u64::from(element_type.components() * component_type.byte_size());
        let stride = element_size.max(view.byte_stride.unwrap_or(0));

        Ok(Self {
            buffer_view: def.buffer_view,
            component_type,
            element_type,
            normalized: def.normalized,
            count: def.count,
            byte_offset: def.byte_offset,
            element_size,
            stride,
            byte_length: u64::from(def.count) * stride,
        })
    }

    /// The vertex format this accessor reads as.
    ///
    /// 8/16-bit components only exist as scalars or 2/4-wide vectors; matrices
    /// and 64-bit floats have no vertex format at all.
    pub fn vertex_format(&self) -> Result<VertexFormat> {
        vertex_format(self.component_type, self.element_type.components(), self.normalized)
    }
}

/// Resolves every accessor of a document, failing on the first bad one.
pub fn resolve_accessors(accessors: &[AccessorDef], views: &[BufferViewDef]) -> Result<Vec<Accessor>> {
    accessors
        .iter()
        .map(|def| {
            let view = views.get(def.buffer_view).ok_or(ResourceError::IndexOutOfBounds {
                context: "accessor.bufferView",
                index: def.buffer_view,
            })?;
            Accessor::resolve(def, view)
        })
        .collect()
}

#[allow(clippy::match_same_arms)]
pub fn vertex_format(component_type: ComponentType, components: u32, normalized: bool) -> Result<VertexFormat> {
    use ComponentType as C;
    use VertexFormat as F;

    let format = match (component_type, normalized, components) {
        (C::F64, ..) => return Err(ResourceError::UnsupportedComponentType(C::F64.code()).into()),

        (C::F32, _, 1) => F::Float32,
        (C::F32, _, 2) => F::Float32x2,
        (C::F32, _, 3) => F::Float32x3,
        (C::F32, _, 4) => F::Float32x4,

        (C::U32, _, 1) => F::Uint32,
        (C::U32, _, 2) => F::Uint32x2,
        (C::U32, _, 3) => F::Uint32x3,
        (C::U32, _, 4) => F::Uint32x4,

        (C::U16, false, 1) => F::Uint16,
        (C::U16, false, 2) => F::Uint16x2,
        (C::U16, false, 4) => F::Uint16x4,
        (C::U16, true, 1) => F::Unorm16,
        (C::U16, true, 2) => F::Unorm16x2,
        (C::U16, true, 4) => F::Unorm16x4,

        (C::I16, false, 1) => F::Sint16,
        (C::I16, false, 2) => F::Sint16x2,
        (C::I16, false, 4) => F::Sint16x4,
        (C::I16, true, 1) => F::Snorm16,
        (C::I16, true, 2) => F::Snorm16x2,
        (C::I16, true, 4) => F::Snorm16x4,

        (C::U8, false, 1) => F::Uint8,
        (C::U8, false, 2) => F::Uint8x2,
        (C::U8, false, 4) => F::Uint8x4,
        (C::U8, true, 1) => F::Unorm8,
        (C::U8, true, 2) => F::Unorm8x2,
        (C::U8, true, 4) => F::Unorm8x4,

        (C::I8, false, 1) => F::Sint8,
        (C::I8, false, 2) => F::Sint8x2,
        (C::I8, false, 4) => F::Sint8x4,
        (C::I8, true, 1) => F::Snorm8,
        (C::I8, true, 2) => F::Snorm8x2,
        (C::I8, true, 4) => F::Snorm8x4,

        (component_type, normalized, components) => {
            return Err(ResourceError::UnmappedVertexFormat {
                component_type: component_type.name(),
                components,
                normalized,
            }
            .into());
        }
    };
    Ok(format)
}

/// Index format for an index accessor's vertex format.
pub fn index_format(format: VertexFormat) -> Result<wgpu::IndexFormat> {
    match format {
        VertexFormat::Uint16 => Ok(wgpu::IndexFormat::Uint16),
        VertexFormat::Uint32 => Ok(wgpu::IndexFormat::Uint32),
        other => Err(ResourceError::UnsupportedIndexFormat(other).into()),
    }
}
