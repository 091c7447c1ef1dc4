//! GPU-facing side: backend seam, pipeline cache, settings and counters.

pub mod backend;
pub mod counters;
pub mod pipeline;
pub mod settings;

pub use backend::{RenderBackend, RenderPassEncoder, RenderPipelineRequest, WgpuBackend};
pub use counters::{CounterSnapshot, RenderCounters};
pub use pipeline::{PipelineCache, PipelineKey, RenderPipelineId};
pub use settings::SceneSettings;
