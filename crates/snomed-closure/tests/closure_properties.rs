//! Closure properties over hand-built and generated hierarchies.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use snomed_closure::{
    build_adjacency, compute_closure, AdjacencyGraph, ClosureComputer, ClosureConfig, ClosureError,
    ClosureMap, Milestone, ProgressSink, RelationshipFilter, Strategy,
};
use snomed_types::{well_known, CharacteristicType, ModifierType, Rf2Relationship, SctId};

fn make_relationship(
    source: SctId,
    type_id: SctId,
    destination: SctId,
    active: bool,
) -> Rf2Relationship {
    Rf2Relationship {
        id: 100000028,
        effective_time: 20200131,
        active,
        module_id: well_known::SNOMED_CT_CORE_MODULE,
        source_id: source,
        destination_id: destination,
        relationship_group: 0,
        type_id,
        characteristic_type_id: CharacteristicType::INFERRED_ID,
        modifier_id: ModifierType::EXISTENTIAL_ID,
    }
}

fn make_graph(edges: &[(SctId, SctId)]) -> AdjacencyGraph {
    let rels: Vec<_> = edges
        .iter()
        .map(|&(s, d)| make_relationship(s, well_known::IS_A, d, true))
        .collect();
    build_adjacency(&rels)
}

/// A random DAG: every edge points from a higher to a lower id.
fn make_random_dag(nodes: u64, edges: usize, seed: u64) -> AdjacencyGraph {
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };

    let mut pairs = Vec::with_capacity(edges);
    while pairs.len() < edges {
        let a = next() % nodes + 1;
        let b = next() % nodes + 1;
        if a != b {
            pairs.push((a.max(b), a.min(b)));
        }
    }
    make_graph(&pairs)
}

fn ancestors(closure: &ClosureMap, id: SctId) -> Vec<SctId> {
    let mut ids: Vec<_> = closure.ancestors(id).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_scenario_chain_with_inactive_edge() {
    let rels = vec![
        make_relationship(1, well_known::IS_A, 2, true),
        make_relationship(2, well_known::IS_A, 3, true),
        make_relationship(4, well_known::IS_A, 2, false),
    ];
    let config = ClosureConfig::default();
    let filter = RelationshipFilter::active(&config);

    let graph = build_adjacency(filter.apply(&rels));
    assert_eq!(graph, make_graph(&[(1, 2), (2, 3)]));
    assert!(!graph.contains_source(4));

    let closure = compute_closure(&graph, Strategy::Parallel).unwrap();
    assert_eq!(closure.len(), 2);
    assert_eq!(ancestors(&closure, 1), vec![2, 3]);
    assert_eq!(ancestors(&closure, 2), vec![3]);
}

#[test]
fn test_diamond_counts_shared_ancestor_once() {
    // A=1, B=2, C=3, D=4
    let graph = make_graph(&[(1, 2), (1, 3), (2, 4), (3, 4)]);

    for strategy in [Strategy::Sequential, Strategy::Parallel] {
        let closure = compute_closure(&graph, strategy).unwrap();
        assert_eq!(ancestors(&closure, 1), vec![2, 3, 4]);
        assert_eq!(closure.get(1).map(HashSet::len), Some(3));
    }
}

#[test]
fn test_leaf_concept_has_no_ancestors() {
    let graph = make_graph(&[(1, 2)]);
    let closure = compute_closure(&graph, Strategy::Sequential).unwrap();

    assert!(closure.get(2).is_none());
    assert_eq!(closure.ancestors(2).count(), 0);
    assert!(!closure.is_subsumed_by(2, 1));
}

#[test]
fn test_filter_drops_other_relationship_types() {
    let rels = vec![
        make_relationship(1, well_known::IS_A, 2, true),
        make_relationship(1, well_known::PART_OF, 3, true),
    ];
    let graph = build_adjacency(RelationshipFilter::basic(&ClosureConfig::default()).apply(&rels));

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.successors(1).collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_strategies_agree_on_random_dags() {
    for seed in 1..=8 {
        let graph = make_random_dag(300, 900, seed);
        let sequential = compute_closure(&graph, Strategy::Sequential).unwrap();
        let parallel = compute_closure(&graph, Strategy::Parallel).unwrap();

        assert_eq!(sequential, parallel, "seed {seed}");
        assert!(sequential.cyclic_concepts().is_empty());
    }
}

#[test]
fn test_strategies_agree_on_cyclic_graph() {
    let graph = make_graph(&[(1, 2), (2, 3), (3, 1), (4, 3), (5, 5)]);
    let sequential = compute_closure(&graph, Strategy::Sequential).unwrap();
    let parallel = compute_closure(&graph, Strategy::Parallel).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(ancestors(&sequential, 4), vec![1, 2, 3]);
    assert_eq!(sequential.cyclic_concepts(), vec![1, 2, 3, 5]);
}

#[test]
fn test_sequential_survives_very_long_chain() {
    let mut graph = AdjacencyGraph::new();
    for id in 1..=200_000 {
        graph.insert(id, id + 1, well_known::IS_A);
    }
    let computer = ClosureComputer::new(ClosureConfig::default().with_max_closure_size(150_000));

    match computer.compute(&graph, Strategy::Sequential) {
        Err(ClosureError::TaskFailure { concept_id, reason }) => {
            assert_eq!(concept_id, 1);
            assert!(reason.contains("exceeds 150000"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_closure_is_transitive() {
    let graph = make_random_dag(200, 600, 42);
    let closure = compute_closure(&graph, Strategy::Parallel).unwrap();

    for (a, b) in closure.edges() {
        for c in closure.ancestors(b) {
            assert!(closure.is_subsumed_by(a, c), "{a} -> {b} -> {c}");
        }
    }
}

#[test]
fn test_closure_contains_every_direct_edge() {
    let graph = make_random_dag(100, 250, 7);
    let closure = compute_closure(&graph, Strategy::Sequential).unwrap();

    for source in graph.sources() {
        for destination in graph.successors(source) {
            assert!(closure.is_subsumed_by(source, destination));
        }
    }
    assert_eq!(closure.len(), graph.source_count());
}

#[derive(Default)]
struct RecordingProgress {
    milestones: Mutex<Vec<Milestone>>,
    ticks: Mutex<usize>,
}

impl ProgressSink for RecordingProgress {
    fn milestone(&self, milestone: &Milestone) {
        self.milestones.lock().unwrap().push(*milestone);
    }

    fn node_completed(&self, _done: usize, _total: usize) {
        *self.ticks.lock().unwrap() += 1;
    }
}

#[test]
fn test_run_reports_milestones_in_order() {
    let rels = vec![
        make_relationship(1, well_known::IS_A, 2, true),
        make_relationship(2, well_known::IS_A, 3, true),
        make_relationship(4, well_known::IS_A, 2, false),
    ];
    let config = ClosureConfig::default();
    let filter = RelationshipFilter::active(&config);
    let progress = Arc::new(RecordingProgress::default());

    let closure = ClosureComputer::new(config)
        .with_progress(progress.clone())
        .run(&filter, &rels, Strategy::Parallel)
        .unwrap();

    assert_eq!(closure.pair_count(), 3);
    assert_eq!(
        *progress.milestones.lock().unwrap(),
        vec![
            Milestone::FilterApplied { total: 3, kept: 2 },
            Milestone::AdjacencyBuilt { sources: 2, edges: 2 },
            Milestone::ClosureComputed { sources: 2, pairs: 3 },
        ]
    );
    assert_eq!(*progress.ticks.lock().unwrap(), 2);
}
