//! Scene build settings.
//!
//! ```rust,ignore
//! use myth_glb::SceneSettings;
//!
//! let settings = SceneSettings {
//!     world_bind_group_index: 1,
//!     cull_mode: None,
//!     ..Default::default()
//! };
//! ```

/// Pipeline state and binding conventions used when building a scene.
///
/// Every field that affects pipeline state also ends up in the pipeline key,
/// so scenes built with different settings never share a pipeline by accident.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    /// Bind group index of the per-node world matrix uniform.
    pub world_bind_group_index: u32,
    pub vertex_entry_point: &'static str,
    pub fragment_entry_point: &'static str,
    pub cull_mode: Option<wgpu::Face>,
    pub front_face: wgpu::FrontFace,
    pub depth_write: bool,
    pub depth_compare: wgpu::CompareFunction,
    /// MSAA sample count. 1 disables multisampling.
    pub sample_count: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            world_bind_group_index: 0,
            vertex_entry_point: "vs_main",
            fragment_entry_point: "fs_main",
            cull_mode: Some(wgpu::Face::Back),
            front_face: wgpu::FrontFace::Ccw,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
            sample_count: 1,
        }
    }
}
