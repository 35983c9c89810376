//! Progress reporting hooks.
//!
//! Sinks only observe; nothing they do changes the computed closure.

use tracing::{debug, info};

/// A pipeline milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// The relationship filter ran.
    FilterApplied {
        /// Rows offered to the filter.
        total: usize,
        /// Rows that passed.
        kept: usize,
    },
    /// The adjacency graph is complete.
    AdjacencyBuilt {
        /// Concepts with outgoing edges.
        sources: usize,
        /// Distinct edges.
        edges: usize,
    },
    /// The closure is complete.
    ClosureComputed {
        /// Concepts with a closure entry.
        sources: usize,
        /// Total `(source, ancestor)` pairs.
        pairs: usize,
    },
}

/// Receives progress callbacks. Implementations must be cheap and
/// thread-safe: per-node ticks arrive from worker threads.
pub trait ProgressSink: Send + Sync {
    /// Called once per milestone.
    fn milestone(&self, milestone: &Milestone);

    /// Called after each source concept's closure finishes.
    fn node_completed(&self, _done: usize, _total: usize) {}
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn milestone(&self, _milestone: &Milestone) {}
}

/// Logs milestones at `info` and every `interval`-th node at `debug`.
#[derive(Debug, Clone, Copy)]
pub struct TracingProgress {
    interval: usize,
}

impl TracingProgress {
    /// Logs a node tick every `interval` completed nodes.
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::new(50_000)
    }
}

impl ProgressSink for TracingProgress {
    fn milestone(&self, milestone: &Milestone) {
        match *milestone {
            Milestone::FilterApplied { total, kept } => {
                info!(total, kept, "relationship filter applied");
            }
            Milestone::AdjacencyBuilt { sources, edges } => {
                info!(sources, edges, "adjacency graph built");
            }
            Milestone::ClosureComputed { sources, pairs } => {
                info!(sources, pairs, "transitive closure computed");
            }
        }
    }

    fn node_completed(&self, done: usize, total: usize) {
        if done % self.interval == 0 || done == total {
            debug!(done, total, "closure progress");
        }
    }
}
