//! # Myth GLB
//!
//! Binary glTF loader and render-resource builder.
//!
//! A `.glb` container is split into its JSON document and binary payload,
//! accessors are resolved into typed byte ranges, each primitive's vertex
//! attributes are consolidated into the fewest vertex buffer layouts, and the
//! default scene's node graph is flattened into world-space draw instances.
//! Pipelines are deduplicated through a [`PipelineCache`] owned by whoever
//! owns the device.
//!
//! ```rust,ignore
//! use myth_glb::{PipelineCache, Scene, SceneBuildDescriptor, WgpuBackend};
//!
//! let backend = WgpuBackend::new(device, queue);
//! let mut cache = PipelineCache::new();
//! let mut scene = Scene::<WgpuBackend>::load_from_path("model.glb")?;
//! scene.build(&backend, &mut cache, &SceneBuildDescriptor {
//!     vertex_module: &vs,
//!     fragment_module: &fs,
//!     bind_group_layouts: &[&world_layout, &camera_layout],
//!     color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
//!     depth_format: Some(wgpu::TextureFormat::Depth32Float),
//! })?;
//! scene.render(&mut render_pass);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod assets;
pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;

pub use assets::Glb;
pub use errors::{FormatError, GlbError, ResourceError, Result};
pub use renderer::{
    CounterSnapshot, PipelineCache, PipelineKey, RenderBackend, RenderCounters, RenderPassEncoder,
    RenderPipelineId, RenderPipelineRequest, SceneSettings, WgpuBackend,
};
pub use resources::{Accessor, BufferViewManager, Mesh, Primitive};
pub use scene::{FlattenedNode, Scene, SceneBuildDescriptor};
