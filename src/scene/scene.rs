//! Scene
//!
//! A [`Scene`] is a loaded GLB ready to be turned into GPU resources.
//!
//! # Lifecycle
//!
//! 1. [`Scene::load`] parses the container, resolves accessors, builds every
//!    mesh's vertex layouts and flattens the default scene's node graph. This
//!    is pure CPU work; nothing touches the device.
//! 2. [`Scene::build`] uploads each used buffer view once, creates a world
//!    matrix uniform and bind group per mesh node, and fetches each
//!    primitive's pipeline from the shared [`PipelineCache`].
//! 3. [`Scene::render`] records bind/draw commands into a render pass.
//!
//! A load or build that fails must be discarded; there is no partial scene.
//! Bind groups other than the world-matrix group (camera, lights, ...) are the
//! caller's to set before calling `render`.

use std::path::Path;
use std::sync::Arc;

use crate::assets::glb::Glb;
use crate::errors::{ResourceError, Result};
use crate::renderer::backend::{RenderBackend, RenderPassEncoder, RenderPipelineRequest};
use crate::renderer::counters::RenderCounters;
use crate::renderer::pipeline::cache::PipelineCache;
use crate::renderer::pipeline::pipeline_id::RenderPipelineId;
use crate::renderer::pipeline::pipeline_key::PipelineKey;
use crate::renderer::settings::SceneSettings;
use crate::resources::accessor::{Accessor, resolve_accessors};
use crate::resources::buffer::BufferViewManager;
use crate::resources::mesh::{Mesh, Primitive};
use crate::scene::transform_system::{FlattenedNode, flatten_roots};

/// Device-side inputs of [`Scene::build`].
pub struct SceneBuildDescriptor<'a, B: RenderBackend> {
    pub vertex_module: &'a B::ShaderModule,
    pub fragment_module: &'a B::ShaderModule,
    /// Pipeline layout groups, in group order. Must include the world-matrix
    /// group at [`SceneSettings::world_bind_group_index`].
    pub bind_group_layouts: &'a [&'a B::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

struct NodeResources<B: RenderBackend> {
    mesh: usize,
    uniform: B::Buffer,
    bind_group: B::BindGroup,
}

struct PrimitivePipeline<P> {
    id: RenderPipelineId,
    pipeline: P,
}

pub struct Scene<B: RenderBackend> {
    pub name: Option<String>,
    settings: SceneSettings,
    accessors: Vec<Accessor>,
    buffer_views: BufferViewManager<B::Buffer>,
    meshes: Vec<Mesh>,
    nodes: Vec<FlattenedNode>,

    // ---- Built state ----
    node_resources: Vec<NodeResources<B>>,
    /// Per mesh, per primitive. `None` for meshes no node references.
    pipelines: Vec<Option<Vec<PrimitivePipeline<B::RenderPipeline>>>>,
    built: bool,

    counters: Option<Arc<RenderCounters>>,
}

impl<B: RenderBackend> Scene<B> {
    /// Parses a GLB container and prepares the default scene.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let glb = Glb::from_slice(bytes)?;
        Self::from_glb(&glb, SceneSettings::default())
    }

    /// Reads and loads a `.glb` file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading GLB from {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    /// Prepares the default scene of an already parsed container.
    pub fn from_glb(glb: &Glb<'_>, settings: SceneSettings) -> Result<Self> {
        let document = &glb.document;

        let accessors = resolve_accessors(&document.accessors, &document.buffer_views)?;
        let mut buffer_views = BufferViewManager::new(&document.buffer_views, glb.binary())?;

        let meshes = document
            .meshes
            .iter()
            .map(|mesh| Mesh::build(mesh, &accessors, &mut buffer_views))
            .collect::<Result<Vec<_>>>()?;

        let scene_index = document.scene.unwrap_or(0);
        let (name, roots) = match document.scenes.get(scene_index) {
            Some(scene) => (scene.name.clone(), scene.nodes.as_slice()),
            None if document.scenes.is_empty() => {
                log::warn!("GLB declares no scenes; nothing will be drawn");
                (None, &[][..])
            }
            None => {
                return Err(ResourceError::IndexOutOfBounds {
                    context: "scenes",
                    index: scene_index,
                }
                .into());
            }
        };

        let nodes = flatten_roots(roots, &document.nodes)?;
        for node in &nodes {
            if let Some(mesh) = node.mesh
                && mesh >= meshes.len()
            {
                return Err(ResourceError::IndexOutOfBounds {
                    context: "node.mesh",
                    index: mesh,
                }
                .into());
            }
        }

        log::debug!(
            "Prepared scene {:?}: {} flattened nodes, {} meshes, {} buffer views",
            name,
            nodes.len(),
            meshes.len(),
            buffer_views.len()
        );

        Ok(Self {
            name,
            settings,
            accessors,
            buffer_views,
            meshes,
            nodes,
            node_resources: Vec::new(),
            pipelines: Vec::new(),
            built: false,
            counters: None,
        })
    }

    /// Attaches diagnostics counters. Build and render record into them.
    pub fn set_counters(&mut self, counters: Arc<RenderCounters>) {
        self.counters = Some(counters);
    }

    #[must_use]
    pub fn counters(&self) -> Option<&Arc<RenderCounters>> {
        self.counters.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    #[must_use]
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    #[must_use]
    pub fn buffer_views(&self) -> &BufferViewManager<B::Buffer> {
        &self.buffer_views
    }

    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Every node of the default scene in depth-first order, mesh-less ones included.
    #[must_use]
    pub fn flattened_nodes(&self) -> &[FlattenedNode] {
        &self.nodes
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    // ── Build ────────────────────────────────────────────────────────────────

    /// Creates the scene's GPU resources.
    ///
    /// Calling it again replaces everything it created before; buffer views
    /// are re-uploaded and previous world uniforms destroyed.
    pub fn build(
        &mut self,
        backend: &B,
        cache: &mut PipelineCache<B::RenderPipeline>,
        desc: &SceneBuildDescriptor<'_, B>,
    ) -> Result<()> {
        let world_group = self.settings.world_bind_group_index;
        let world_layout = desc
            .bind_group_layouts
            .get(world_group as usize)
            .ok_or(ResourceError::MissingBindGroupLayout { index: world_group })?;

        self.built = false;
        for old in self.node_resources.drain(..) {
            backend.destroy_buffer(&old.uniform);
        }
        self.pipelines.clear();
        self.pipelines.resize_with(self.meshes.len(), || None);

        let uploaded = self.buffer_views.upload_all(backend);

        for node in &self.nodes {
            let Some(mesh_index) = node.mesh else {
                continue;
            };

            let label = format!("Node {} World", node.index);
            let uniform = backend.create_buffer_init(
                &label,
                bytemuck::bytes_of(&node.world_matrix),
                wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            );
            let bind_group = backend.create_uniform_bind_group(&label, world_layout, &uniform);
            if let Some(counters) = &self.counters {
                counters.bind_group_created();
            }

            if self.pipelines[mesh_index].is_none() {
                let mesh = &self.meshes[mesh_index];
                let pipelines = mesh
                    .primitives
                    .iter()
                    .enumerate()
                    .map(|(i, primitive)| {
                        let label = format!("Mesh {mesh_index} Primitive {i}");
                        Self::primitive_pipeline(
                            backend,
                            cache,
                            desc,
                            &self.settings,
                            self.counters.as_deref(),
                            primitive,
                            &label,
                        )
                    })
                    .collect();
                self.pipelines[mesh_index] = Some(pipelines);
            }

            self.node_resources.push(NodeResources {
                mesh: mesh_index,
                uniform,
                bind_group,
            });
        }

        self.built = true;
        log::info!(
            "Built scene {:?}: {} buffer views uploaded, {} drawable nodes, {} pipelines cached",
            self.name,
            uploaded,
            self.node_resources.len(),
            cache.len()
        );
        Ok(())
    }

    fn primitive_pipeline(
        backend: &B,
        cache: &mut PipelineCache<B::RenderPipeline>,
        desc: &SceneBuildDescriptor<'_, B>,
        settings: &SceneSettings,
        counters: Option<&RenderCounters>,
        primitive: &Primitive,
        label: &str,
    ) -> PrimitivePipeline<B::RenderPipeline> {
        let key = PipelineKey::new(
            desc.vertex_module,
            desc.fragment_module,
            primitive.topology,
            primitive.index_format(),
            primitive.layout.layouts.clone(),
            desc.bind_group_layouts,
            desc.color_format,
            desc.depth_format,
            settings,
        );

        let lookup = cache.get_or_create(&key, |key| {
            backend.create_render_pipeline(&RenderPipelineRequest {
                label,
                key,
                vertex_module: desc.vertex_module,
                fragment_module: desc.fragment_module,
                bind_group_layouts: desc.bind_group_layouts,
                settings,
            })
        });
        if lookup.created
            && let Some(counters) = counters
        {
            counters.pipeline_created();
        }

        PrimitivePipeline {
            id: lookup.id,
            pipeline: cache.get(lookup.id).clone(),
        }
    }

    // ── Render ───────────────────────────────────────────────────────────────

    /// Records the scene's draws. Does nothing before [`build`](Self::build).
    pub fn render<P: RenderPassEncoder<B>>(&self, pass: &mut P) {
        let mut current_pipeline: Option<RenderPipelineId> = None;

        for node in &self.node_resources {
            pass.set_bind_group(self.settings.world_bind_group_index, &node.bind_group);
            self.tally(RenderCounters::bind_group_switched);

            let Some(Some(pipelines)) = self.pipelines.get(node.mesh) else {
                continue;
            };

            for (primitive, pipeline) in self.meshes[node.mesh].primitives.iter().zip(pipelines) {
                if current_pipeline != Some(pipeline.id) {
                    pass.set_pipeline(&pipeline.pipeline);
                    current_pipeline = Some(pipeline.id);
                    self.tally(RenderCounters::pipeline_switched);
                }

                if !self.bind_vertex_buffers(pass, primitive) {
                    continue;
                }

                match primitive.indices {
                    Some(indices) => {
                        let Some(buffer) = self.buffer_views.gpu_buffer(indices.buffer_view) else {
                            log::warn!("Index buffer view {} was never uploaded", indices.buffer_view);
                            continue;
                        };
                        pass.set_index_buffer(buffer, indices.format, indices.offset, indices.size);
                        self.tally(RenderCounters::buffer_bound);
                        pass.draw_indexed(0..indices.count, 0, 0..1);
                    }
                    None => pass.draw(0..primitive.layout.vertex_count, 0..1),
                }
                self.tally(RenderCounters::draw_issued);
            }
        }
    }

    /// Binds each layout slot in order. Returns `false` if a buffer is missing.
    fn bind_vertex_buffers<P: RenderPassEncoder<B>>(&self, pass: &mut P, primitive: &Primitive) -> bool {
        for (slot, binding) in primitive.layout.bindings.iter().enumerate() {
            let Some(buffer) = self.buffer_views.gpu_buffer(binding.buffer_view) else {
                log::warn!("Vertex buffer view {} was never uploaded", binding.buffer_view);
                return false;
            };
            log::trace!(
                "slot {slot}: view {} offset {} size {}",
                binding.buffer_view,
                binding.offset,
                binding.size
            );
            pass.set_vertex_buffer(slot as u32, buffer, binding.offset, binding.size);
            self.tally(RenderCounters::buffer_bound);
        }
        true
    }

    #[inline]
    fn tally(&self, record: impl FnOnce(&RenderCounters)) {
        if let Some(counters) = &self.counters {
            record(counters);
        }
    }
}
