//! Transitive closure over an [`AdjacencyGraph`].
//!
//! Two traversals compute the same map:
//!
//! - [`Strategy::Sequential`] walks each source concept depth-first with an
//!   explicit stack, recording every node it reaches.
//! - [`Strategy::Parallel`] drains a per-source worklist breadth-first, one
//!   rayon task per source concept. Each task owns its result; results are
//!   merged once every task has finished.
//!
//! In both, a node already in the closure being built is not revisited, so
//! cycles terminate.

use std::collections::{HashMap, HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use snomed_types::{Rf2Relationship, SctId};
use tracing::{debug, instrument, warn};

use crate::adjacency::{build_adjacency, AdjacencyGraph};
use crate::config::{ClosureConfig, CyclePolicy};
use crate::error::{ClosureError, ClosureResult};
use crate::filter::RelationshipFilter;
use crate::progress::{Milestone, NoProgress, ProgressSink};

/// Traversal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Depth-first traversal on the calling thread.
    Sequential,
    /// Worklist traversal, one task per source concept.
    #[default]
    Parallel,
}

/// Concept to the set of every concept reachable through one or more edges.
///
/// Only concepts with outgoing edges have an entry; lookups of any other
/// concept behave as an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureMap {
    ancestors: HashMap<SctId, HashSet<SctId>>,
}

impl ClosureMap {
    /// All ancestors of `id`.
    pub fn ancestors(&self, id: SctId) -> impl Iterator<Item = SctId> + '_ {
        self.ancestors.get(&id).into_iter().flat_map(|set| set.iter().copied())
    }

    /// The ancestor set of `id`, if it has outgoing edges.
    pub fn get(&self, id: SctId) -> Option<&HashSet<SctId>> {
        self.ancestors.get(&id)
    }

    /// Returns true if `ancestor` is reachable from `id`.
    pub fn is_subsumed_by(&self, id: SctId, ancestor: SctId) -> bool {
        self.ancestors
            .get(&id)
            .is_some_and(|set| set.contains(&ancestor))
    }

    /// Concepts with a closure entry.
    pub fn sources(&self) -> impl Iterator<Item = SctId> + '_ {
        self.ancestors.keys().copied()
    }

    /// Every `(source, ancestor)` pair, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (SctId, SctId)> + '_ {
        self.ancestors
            .iter()
            .flat_map(|(&src, set)| set.iter().map(move |&dst| (src, dst)))
    }

    /// Concepts that are their own ancestor, ascending.
    pub fn cyclic_concepts(&self) -> Vec<SctId> {
        let mut ids: Vec<SctId> = self
            .ancestors
            .iter()
            .filter(|(id, set)| set.contains(*id))
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of concepts with an entry.
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    /// Returns true if no concept has an entry.
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Total number of `(source, ancestor)` pairs.
    pub fn pair_count(&self) -> usize {
        self.ancestors.values().map(HashSet::len).sum()
    }

    /// Consumes the map, returning the underlying sets.
    pub fn into_inner(self) -> HashMap<SctId, HashSet<SctId>> {
        self.ancestors
    }
}

impl FromIterator<(SctId, HashSet<SctId>)> for ClosureMap {
    fn from_iter<I: IntoIterator<Item = (SctId, HashSet<SctId>)>>(iter: I) -> Self {
        Self {
            ancestors: iter.into_iter().collect(),
        }
    }
}

type TaskResult = Result<HashSet<SctId>, String>;

/// Runs the filter, adjacency and closure stages.
///
/// ```
/// use snomed_closure::{build_adjacency, ClosureComputer, ClosureConfig, Strategy};
/// use snomed_types::Rf2Relationship;
///
/// let relationships: Vec<Rf2Relationship> = Vec::new();
/// let computer = ClosureComputer::new(ClosureConfig::default());
/// let closure = computer
///     .compute(&build_adjacency(&relationships), Strategy::Sequential)
///     .unwrap();
/// assert!(closure.is_empty());
/// ```
pub struct ClosureComputer {
    config: ClosureConfig,
    progress: Arc<dyn ProgressSink>,
    cancelled: Arc<AtomicBool>,
}

impl ClosureComputer {
    /// Creates a computer with no progress reporting.
    pub fn new(config: ClosureConfig) -> Self {
        Self {
            config,
            progress: Arc::new(NoProgress),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reports progress to `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Uses `flag` for cooperative cancellation.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// A handle that cancels the computation when set to `true`.
    ///
    /// The flag is checked between source concepts, never inside one.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClosureConfig {
        &self.config
    }

    /// Filters `relationships`, builds the adjacency graph and computes
    /// its closure, reporting each milestone.
    ///
    /// # Errors
    /// See [`compute`](Self::compute).
    pub fn run(
        &self,
        filter: &RelationshipFilter,
        relationships: &[Rf2Relationship],
        strategy: Strategy,
    ) -> ClosureResult<ClosureMap> {
        let kept = filter.apply(relationships);
        self.progress.milestone(&Milestone::FilterApplied {
            total: relationships.len(),
            kept: kept.len(),
        });

        let graph = build_adjacency(kept);
        self.progress.milestone(&Milestone::AdjacencyBuilt {
            sources: graph.source_count(),
            edges: graph.edge_count(),
        });

        self.compute(&graph, strategy)
    }

    /// Computes the closure of every concept with outgoing edges.
    ///
    /// # Errors
    /// - [`ClosureError::InvalidConfiguration`] before any work if the
    ///   configuration does not validate.
    /// - [`ClosureError::Cancelled`] if the cancel flag was raised.
    /// - [`ClosureError::TaskFailure`] for the lowest source id whose
    ///   traversal panicked or exceeded `max_closure_size`.
    /// - [`ClosureError::CycleDetected`] under [`CyclePolicy::Reject`].
    #[instrument(skip_all, fields(strategy = ?strategy, sources = graph.source_count()))]
    pub fn compute(
        &self,
        graph: &AdjacencyGraph,
        strategy: Strategy,
    ) -> ClosureResult<ClosureMap> {
        self.config.validate()?;

        let mut sources: Vec<SctId> = graph.sources().collect();
        sources.sort_unstable();

        let closure = match strategy {
            Strategy::Sequential => self.compute_sequential(graph, &sources)?,
            Strategy::Parallel => self.compute_parallel(graph, &sources)?,
        };

        if self.config.cycle_policy == CyclePolicy::Reject {
            if let Some(&concept_id) = closure.cyclic_concepts().first() {
                return Err(ClosureError::CycleDetected { concept_id });
            }
        } else {
            let cyclic = closure.cyclic_concepts();
            if !cyclic.is_empty() {
                warn!(count = cyclic.len(), first = cyclic[0], "hierarchy contains cycles");
            }
        }

        self.progress.milestone(&Milestone::ClosureComputed {
            sources: closure.len(),
            pairs: closure.pair_count(),
        });
        Ok(closure)
    }

    fn compute_sequential(
        &self,
        graph: &AdjacencyGraph,
        sources: &[SctId],
    ) -> ClosureResult<ClosureMap> {
        let total = sources.len();
        let mut ancestors = HashMap::with_capacity(total);

        for (done, &id) in sources.iter().enumerate() {
            if self.is_cancelled() {
                return Err(ClosureError::Cancelled);
            }
            let set = run_task(|| depth_first(graph, id, self.config.max_closure_size))
                .map_err(|reason| ClosureError::TaskFailure {
                    concept_id: id,
                    reason,
                })?;
            ancestors.insert(id, set);
            self.progress.node_completed(done + 1, total);
        }

        Ok(ClosureMap { ancestors })
    }

    #[cfg(feature = "parallel")]
    fn compute_parallel(
        &self,
        graph: &AdjacencyGraph,
        sources: &[SctId],
    ) -> ClosureResult<ClosureMap> {
        use rayon::prelude::*;

        let total = sources.len();
        let done = AtomicUsize::new(0);

        let outcomes: Vec<(SctId, Option<TaskResult>)> = sources
            .par_iter()
            .map(|&id| {
                if self.is_cancelled() {
                    return (id, None);
                }
                let outcome = run_task(|| worklist(graph, id, self.config.max_closure_size));
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress.node_completed(finished, total);
                (id, Some(outcome))
            })
            .collect();

        self.merge(outcomes)
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_parallel(
        &self,
        graph: &AdjacencyGraph,
        sources: &[SctId],
    ) -> ClosureResult<ClosureMap> {
        let total = sources.len();
        let done = AtomicUsize::new(0);

        let outcomes: Vec<(SctId, Option<TaskResult>)> = sources
            .iter()
            .map(|&id| {
                if self.is_cancelled() {
                    return (id, None);
                }
                let outcome = run_task(|| worklist(graph, id, self.config.max_closure_size));
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress.node_completed(finished, total);
                (id, Some(outcome))
            })
            .collect();

        self.merge(outcomes)
    }

    /// Merges per-task outcomes, already in ascending source order.
    fn merge(&self, outcomes: Vec<(SctId, Option<TaskResult>)>) -> ClosureResult<ClosureMap> {
        let mut ancestors = HashMap::with_capacity(outcomes.len());
        let mut first_failure = None;
        let mut skipped = false;

        for (id, outcome) in outcomes {
            match outcome {
                Some(Ok(set)) => {
                    ancestors.insert(id, set);
                }
                Some(Err(reason)) => {
                    debug!(concept_id = id, %reason, "closure task failed");
                    if first_failure.is_none() {
                        first_failure = Some(ClosureError::TaskFailure {
                            concept_id: id,
                            reason,
                        });
                    }
                }
                None => skipped = true,
            }
        }

        if skipped || self.is_cancelled() {
            return Err(ClosureError::Cancelled);
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(ClosureMap { ancestors }),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ClosureComputer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureComputer")
            .field("config", &self.config)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Computes a closure with the default configuration.
///
/// # Errors
/// See [`ClosureComputer::compute`].
pub fn compute_closure(graph: &AdjacencyGraph, strategy: Strategy) -> ClosureResult<ClosureMap> {
    ClosureComputer::new(ClosureConfig::default()).compute(graph, strategy)
}

fn run_task<F>(task: F) -> TaskResult
where
    F: FnOnce() -> TaskResult,
{
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(result) => result,
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

fn check_bound(closure: &HashSet<SctId>, limit: Option<usize>) -> Result<(), String> {
    match limit {
        Some(max) if closure.len() > max => Err(format!("closure exceeds {max} concepts")),
        _ => Ok(()),
    }
}

fn depth_first(graph: &AdjacencyGraph, source: SctId, limit: Option<usize>) -> TaskResult {
    let mut closure = HashSet::new();
    let mut stack = vec![source];

    while let Some(node) = stack.pop() {
        for next in graph.successors(node) {
            if closure.insert(next) {
                check_bound(&closure, limit)?;
                stack.push(next);
            }
        }
    }
    Ok(closure)
}

fn worklist(graph: &AdjacencyGraph, source: SctId, limit: Option<usize>) -> TaskResult {
    let mut closure = HashSet::new();
    let mut queue = VecDeque::new();

    for next in graph.successors(source) {
        if closure.insert(next) {
            queue.push_back(next);
        }
    }
    check_bound(&closure, limit)?;

    while let Some(node) = queue.pop_front() {
        for next in graph.successors(node) {
            if closure.insert(next) {
                check_bound(&closure, limit)?;
                queue.push_back(next);
            }
        }
    }
    Ok(closure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_graph(edges: &[(SctId, SctId)]) -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::new();
        for &(src, dst) in edges {
            graph.insert(src, dst, snomed_types::well_known::IS_A);
        }
        graph
    }

    fn sorted(closure: &ClosureMap, id: SctId) -> Vec<SctId> {
        let mut ids: Vec<_> = closure.ancestors(id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_chain() {
        let graph = make_graph(&[(1, 2), (2, 3)]);
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let closure = compute_closure(&graph, strategy).unwrap();
            assert_eq!(sorted(&closure, 1), vec![2, 3]);
            assert_eq!(sorted(&closure, 2), vec![3]);
            assert!(closure.get(3).is_none());
            assert_eq!(closure.pair_count(), 3);
        }
    }

    #[test]
    fn test_self_loop_terminates() {
        let graph = make_graph(&[(1, 1)]);
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let closure = compute_closure(&graph, strategy).unwrap();
            assert_eq!(sorted(&closure, 1), vec![1]);
            assert_eq!(closure.cyclic_concepts(), vec![1]);
        }
    }

    #[test]
    fn test_reject_cycles_reports_lowest_id() {
        let graph = make_graph(&[(5, 7), (7, 5), (3, 5)]);
        let computer =
            ClosureComputer::new(ClosureConfig::default().with_cycle_policy(CyclePolicy::Reject));

        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            assert_eq!(
                computer.compute(&graph, strategy),
                Err(ClosureError::CycleDetected { concept_id: 5 })
            );
        }
    }

    #[test]
    fn test_depth_first_handles_long_chain() {
        let mut graph = AdjacencyGraph::new();
        for id in 1..=150_000 {
            graph.insert(id, id + 1, snomed_types::well_known::IS_A);
        }

        let set = depth_first(&graph, 1, None).unwrap();
        assert_eq!(set.len(), 150_000);
        assert!(set.contains(&150_001));
    }

    #[test]
    fn test_worklist_seeds_direct_successors() {
        // A direct successor that is a leaf must still be recorded.
        let graph = make_graph(&[(1, 2)]);
        let set = worklist(&graph, 1, None).unwrap();
        assert_eq!(set, HashSet::from([2]));
    }

    #[test]
    fn test_max_closure_size_fails_task() {
        let graph = make_graph(&[(1, 2), (2, 3), (3, 4), (10, 4)]);
        let computer = ClosureComputer::new(ClosureConfig::default().with_max_closure_size(2));

        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            match computer.compute(&graph, strategy) {
                Err(ClosureError::TaskFailure { concept_id, reason }) => {
                    assert_eq!(concept_id, 1);
                    assert!(reason.contains("exceeds 2"));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_run_task_captures_panic() {
        let result = run_task(|| panic!("boom"));
        assert_eq!(result, Err("panicked: boom".to_string()));
    }

    #[test]
    fn test_cancelled_before_start() {
        let graph = make_graph(&[(1, 2)]);
        let computer = ClosureComputer::new(ClosureConfig::default());
        computer.cancel_flag().store(true, Ordering::Relaxed);

        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            assert_eq!(computer.compute(&graph, strategy), Err(ClosureError::Cancelled));
        }
    }

    #[test]
    fn test_invalid_config_fails_before_work() {
        let graph = make_graph(&[(1, 2)]);
        let computer = ClosureComputer::new(ClosureConfig::default().with_is_a_type_id(42));

        assert!(matches!(
            computer.compute(&graph, Strategy::Parallel),
            Err(ClosureError::InvalidConfiguration { field: "is_a_type_id", id: 42 })
        ));
    }

    #[test]
    fn test_shared_cancel_flag_stops_every_computer() {
        let graph = make_graph(&[(1, 2)]);
        let flag = Arc::new(AtomicBool::new(false));
        let first =
            ClosureComputer::new(ClosureConfig::default()).with_cancel_flag(Arc::clone(&flag));
        let second =
            ClosureComputer::new(ClosureConfig::default()).with_cancel_flag(Arc::clone(&flag));

        assert!(first.compute(&graph, Strategy::Sequential).is_ok());
        flag.store(true, Ordering::Relaxed);
        assert_eq!(first.compute(&graph, Strategy::Sequential), Err(ClosureError::Cancelled));
        assert_eq!(second.compute(&graph, Strategy::Parallel), Err(ClosureError::Cancelled));
    }

    #[test]
    fn test_into_inner_keeps_sets() {
        let graph = make_graph(&[(1, 2), (2, 3)]);
        let inner = compute_closure(&graph, Strategy::Parallel).unwrap().into_inner();

        assert_eq!(inner.len(), 2);
        assert_eq!(inner[&1], HashSet::from([2, 3]));
        assert_eq!(inner[&2], HashSet::from([3]));
    }

    #[test]
    fn test_edges_flatten_closure() {
        let graph = make_graph(&[(1, 2), (2, 3)]);
        let closure = compute_closure(&graph, Strategy::Sequential).unwrap();

        let mut edges: Vec<_> = closure.edges().collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(1, 2), (1, 3), (2, 3)]);
    }
}
