//! CPU-side resource descriptions: accessors, buffer views, meshes.

pub mod accessor;
pub mod buffer;
pub mod mesh;

pub use accessor::{Accessor, ComponentType, ElementType};
pub use buffer::{BufferView, BufferViewManager, ByteRange};
pub use mesh::{IndexBinding, Mesh, Primitive};
