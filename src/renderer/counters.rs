//! Render diagnostics counters.
//!
//! Optional tallies of resource creation and state changes. A scene only
//! records into counters that were attached to it.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderCounters {
    pipelines_created: AtomicU64,
    pipeline_switches: AtomicU64,
    bind_groups_created: AtomicU64,
    bind_group_switches: AtomicU64,
    buffer_bindings: AtomicU64,
    draw_calls: AtomicU64,
}

/// Plain copy of the counter values at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub pipelines_created: u64,
    pub pipeline_switches: u64,
    pub bind_groups_created: u64,
    pub bind_group_switches: u64,
    pub buffer_bindings: u64,
    pub draw_calls: u64,
}

impl RenderCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pipeline_created(&self) {
        self.pipelines_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn pipeline_switched(&self) {
        self.pipeline_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn bind_group_created(&self) {
        self.bind_groups_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn bind_group_switched(&self) {
        self.bind_group_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn buffer_bound(&self) {
        self.buffer_bindings.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn draw_issued(&self) {
        self.draw_calls.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            pipelines_created: self.pipelines_created.load(Ordering::Relaxed),
            pipeline_switches: self.pipeline_switches.load(Ordering::Relaxed),
            bind_groups_created: self.bind_groups_created.load(Ordering::Relaxed),
            bind_group_switches: self.bind_group_switches.load(Ordering::Relaxed),
            buffer_bindings: self.buffer_bindings.load(Ordering::Relaxed),
            draw_calls: self.draw_calls.load(Ordering::Relaxed),
        }
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        for counter in [
            &self.pipelines_created,
            &self.pipeline_switches,
            &self.bind_groups_created,
            &self.bind_group_switches,
            &self.buffer_bindings,
            &self.draw_calls,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
