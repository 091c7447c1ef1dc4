//! Scene graph flattening and the renderable scene.

pub mod scene;
pub mod transform_system;

pub use scene::{Scene, SceneBuildDescriptor};
pub use transform_system::{FlattenedNode, flatten, local_matrix};
