//! glTF JSON document schema.
//!
//! Only the fields the builder consumes are declared. Each entity is
//! deserialized field by field; unknown keys (materials, extensions, ...) are
//! ignored rather than carried along, and missing required fields fail with a
//! typed JSON error.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub asset: Option<AssetInfo>,
    /// Default scene index. Absent means scene 0.
    #[serde(default)]
    pub scene: Option<usize>,
    #[serde(default)]
    pub scenes: Vec<SceneDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub meshes: Vec<MeshDef>,
    #[serde(default)]
    pub accessors: Vec<AccessorDef>,
    #[serde(default)]
    pub buffer_views: Vec<BufferViewDef>,
    #[serde(default)]
    pub buffers: Vec<BufferDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub generator: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mesh: Option<usize>,
    #[serde(default)]
    pub camera: Option<usize>,
    #[serde(default)]
    pub children: Vec<usize>,
    /// Column-major 4x4 matrix. Takes precedence over TRS when present.
    #[serde(default)]
    pub matrix: Option<[f32; 16]>,
    /// Quaternion `[x, y, z, w]`.
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    #[serde(default)]
    pub translation: Option<[f32; 3]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshDef {
    #[serde(default)]
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimitiveDef {
    /// Topology code. Absent means triangles (4).
    #[serde(default)]
    pub mode: Option<u32>,
    /// Attribute semantic -> accessor index.
    pub attributes: BTreeMap<String, usize>,
    #[serde(default)]
    pub indices: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorDef {
    pub buffer_view: usize,
    pub component_type: u32,
    pub count: u32,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub byte_offset: u64,
    #[serde(default)]
    pub normalized: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferViewDef {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: u64,
    pub byte_length: u64,
    #[serde(default)]
    pub byte_stride: Option<u64>,
    #[serde(default)]
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferDef {
    pub byte_length: u64,
    #[serde(default)]
    pub uri: Option<String>,
}
