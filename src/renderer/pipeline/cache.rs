//! Pipeline Cache
//!
//! Deduplicates render pipelines by structural signature. Pipelines live in a
//! contiguous `Vec` addressed through [`RenderPipelineId`] handles; the lookup
//! table maps each canonical [`PipelineKey`] to its handle.
//!
//! # Ownership
//!
//! A cache belongs to exactly one device. Whoever owns the device owns the
//! cache and lends it to scene builds, so keys from different devices can
//! never collide. Entries are never evicted: the number of distinct primitive
//! shapes in a scene is small.
//!
//! # Concurrency
//!
//! `get_or_create` takes `&mut self`. Loaders on several threads must share
//! the cache behind a mutex (or load from a single thread).

use rustc_hash::FxHashMap;

use crate::renderer::pipeline::pipeline_id::RenderPipelineId;
use crate::renderer::pipeline::pipeline_key::PipelineKey;

/// Result of [`PipelineCache::get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLookup {
    pub id: RenderPipelineId,
    /// `true` when the factory ran for this call.
    pub created: bool,
}

/// Central pipeline storage and deduplication cache.
pub struct PipelineCache<P> {
    pipelines: Vec<P>,
    lookup: FxHashMap<PipelineKey, RenderPipelineId>,
}

impl<P> Default for PipelineCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PipelineCache<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipelines: Vec::with_capacity(64),
            lookup: FxHashMap::default(),
        }
    }

    /// Returns the pipeline for `key`, running `factory` only on a miss.
    pub fn get_or_create<F>(&mut self, key: &PipelineKey, factory: F) -> PipelineLookup
    where
        F: FnOnce(&PipelineKey) -> P,
    {
        if let Some(&id) = self.lookup.get(key) {
            return PipelineLookup { id, created: false };
        }

        let id = RenderPipelineId(self.pipelines.len() as u32);
        self.pipelines.push(factory(key));
        self.lookup.insert(key.clone(), id);

        log::debug!(
            "Created {}: {:?}, {} vertex buffer(s)",
            id,
            key.topology,
            key.vertex_layouts.len()
        );

        PipelineLookup { id, created: true }
    }

    /// Retrieve a pipeline by handle. **Panics** if the id came from another cache.
    #[inline]
    #[must_use]
    pub fn get(&self, id: RenderPipelineId) -> &P {
        &self.pipelines[id.index()]
    }

    /// Number of cached pipelines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}
