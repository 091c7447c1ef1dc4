//! Pipeline module
//!
//! - vertex: vertex buffer layout consolidation
//! - pipeline_key: structural pipeline signature
//! - cache: deduplicating pipeline storage

pub mod cache;
pub mod pipeline_id;
pub mod pipeline_key;
pub mod vertex;

pub use cache::{PipelineCache, PipelineLookup};
pub use pipeline_id::RenderPipelineId;
pub use pipeline_key::PipelineKey;
pub use vertex::{AttributeAccessor, BufferLayout, PrimitiveLayout, VertexBinding, build_vertex_layout};
