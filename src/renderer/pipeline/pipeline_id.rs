//! Pipeline handles handed out by the [`PipelineCache`].
//!
//! [`PipelineCache`]: super::cache::PipelineCache

use std::fmt;

/// Index of a pipeline inside one cache. Comparing ids is how the scene
/// renderer skips redundant `set_pipeline` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPipelineId(pub(crate) u32);

impl RenderPipelineId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RenderPipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline #{}", self.0)
    }
}
