//! Container parsing and the JSON document schema.

pub mod document;
pub mod glb;

pub use document::Document;
pub use glb::Glb;
