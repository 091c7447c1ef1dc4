//! Error Types
//!
//! This module defines the error types used throughout the loader.
//!
//! # Overview
//!
//! Two families of failure exist, both fatal at first occurrence:
//! - [`FormatError`]: the container itself is malformed (bad header, missing
//!   chunks, invalid JSON text). No document is ever returned.
//! - [`ResourceError`]: the document is well formed but describes something the
//!   builder cannot express (unsupported component type, unmapped vertex
//!   format, unsupported topology, dangling indices).
//!
//! Both are wrapped by [`GlbError`], and all public APIs return [`Result<T>`].
//!
//! ```rust,ignore
//! use myth_glb::errors::{GlbError, FormatError};
//!
//! match myth_glb::Glb::from_slice(&bytes) {
//!     Err(GlbError::Format(FormatError::BadMagic { found })) => { /* not a GLB */ }
//!     _ => {}
//! }
//! ```

use thiserror::Error;

/// The container failed structural validation.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The first word is not the GLB magic.
    #[error("Bad magic: expected 0x46546C67, found {found:#010x}")]
    BadMagic { found: u32 },

    /// The version word is not the supported container version.
    #[error("Unsupported container version {found} (only version 2 is supported)")]
    UnsupportedVersion { found: u32 },

    /// The first chunk is absent or is not tagged as JSON.
    #[error("Missing JSON chunk")]
    MissingJsonChunk,

    /// The second chunk is absent or is not tagged as binary.
    #[error("Missing binary chunk")]
    MissingBinaryChunk,

    /// A header or chunk declares more bytes than the input holds.
    #[error("Truncated container: needed {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    /// The JSON chunk is not valid UTF-8.
    #[error("JSON chunk is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The JSON chunk does not parse into the expected document shape.
    #[error("JSON parse error: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// The document references something the builder cannot turn into GPU resources.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Component type code with no vertex-format mapping (e.g. 64-bit float).
    #[error("Unsupported accessor component type {0}")]
    UnsupportedComponentType(u32),

    /// Element type tag outside `SCALAR`, `VEC2..4`, `MAT2..4`.
    #[error("Unknown accessor element type \"{0}\"")]
    UnknownElementType(String),

    /// The component type / width combination has no vertex format.
    #[error("No vertex format for {components} x {component_type} (normalized: {normalized})")]
    UnmappedVertexFormat {
        component_type: &'static str,
        components: u32,
        normalized: bool,
    },

    /// Primitive `mode` that has no render topology (line loop, triangle fan).
    #[error("Unsupported primitive topology mode {0}")]
    UnsupportedTopology(u32),

    /// Index accessor whose format cannot be bound as an index buffer.
    #[error("Unsupported index format {0:?}")]
    UnsupportedIndexFormat(wgpu::VertexFormat),

    /// A document index points past the end of its array.
    #[error("Index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
    },

    /// Buffer views may only reference the embedded binary chunk.
    #[error("Buffer view {view} references external buffer {buffer}")]
    ExternalBuffer { view: usize, buffer: usize },

    /// A buffer view's byte range does not fit inside the binary payload.
    #[error("Buffer view {view} range {offset}..{end} exceeds payload of {payload} bytes")]
    ViewOutOfRange {
        view: usize,
        offset: usize,
        end: usize,
        payload: usize,
    },

    /// A vertex or index binding would cover zero bytes of its buffer view.
    #[error("Empty binding at offset {offset} of buffer view {view}")]
    EmptyBinding { view: usize, offset: u64 },

    /// The node graph loops back onto one of its own ancestors.
    #[error("Node {0} is its own ancestor")]
    NodeCycle(usize),

    /// No bind group layout was supplied for the world-matrix group.
    #[error("No bind group layout supplied for group {index}")]
    MissingBindGroupLayout { index: u32 },
}

/// The main error type for GLB loading and scene building.
#[derive(Error, Debug)]
pub enum GlbError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GlbError {
    fn from(err: serde_json::Error) -> Self {
        GlbError::Format(FormatError::InvalidJson(err))
    }
}

/// Alias for `Result<T, GlbError>`.
pub type Result<T> = std::result::Result<T, GlbError>;
