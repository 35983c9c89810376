//! Direct-successor graph built from hierarchy relationships.

use std::collections::HashMap;

use snomed_types::{Rf2Relationship, SctId};
use tracing::instrument;

/// Source concept to direct successors, each tagged with the relationship
/// type that produced the edge.
///
/// Concepts without outgoing edges have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    edges: HashMap<SctId, HashMap<SctId, SctId>>,
}

impl AdjacencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge. A repeated `(source, destination)` pair keeps the last
    /// type written.
    pub fn insert(&mut self, source: SctId, destination: SctId, type_id: SctId) {
        self.edges
            .entry(source)
            .or_default()
            .insert(destination, type_id);
    }

    /// Direct successors of `id`; empty when `id` has no outgoing edges.
    pub fn successors(&self, id: SctId) -> impl Iterator<Item = SctId> + '_ {
        self.edges.get(&id).into_iter().flat_map(|dst| dst.keys().copied())
    }

    /// Direct successors of `id` with their relationship types.
    pub fn successor_types(&self, id: SctId) -> Option<&HashMap<SctId, SctId>> {
        self.edges.get(&id)
    }

    /// Returns true if `id` has at least one outgoing edge.
    pub fn contains_source(&self, id: SctId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Concepts with at least one outgoing edge, in no particular order.
    pub fn sources(&self) -> impl Iterator<Item = SctId> + '_ {
        self.edges.keys().copied()
    }

    /// Number of concepts with outgoing edges.
    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashMap::len).sum()
    }

    /// Returns true if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Builds the adjacency graph from already filtered relationships.
///
/// ```
/// use snomed_closure::build_adjacency;
/// use snomed_types::Rf2Relationship;
///
/// let rels: Vec<Rf2Relationship> = Vec::new();
/// assert!(build_adjacency(&rels).is_empty());
/// ```
#[instrument(skip_all)]
pub fn build_adjacency<'a, I>(relationships: I) -> AdjacencyGraph
where
    I: IntoIterator<Item = &'a Rf2Relationship>,
{
    let mut graph = AdjacencyGraph::new();
    for rel in relationships {
        graph.insert(rel.source_id, rel.destination_id, rel.type_id);
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use snomed_types::{well_known, CharacteristicType, ModifierType};

    fn make_is_a(source: SctId, destination: SctId) -> Rf2Relationship {
        Rf2Relationship {
            id: 100000028,
            effective_time: 20200131,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            source_id: source,
            destination_id: destination,
            relationship_group: 0,
            type_id: well_known::IS_A,
            characteristic_type_id: CharacteristicType::INFERRED_ID,
            modifier_id: ModifierType::EXISTENTIAL_ID,
        }
    }

    #[test]
    fn test_build_adjacency() {
        let rels = vec![make_is_a(1, 2), make_is_a(1, 3), make_is_a(2, 3)];
        let graph = build_adjacency(&rels);

        assert_eq!(graph.source_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        let mut succ: Vec<_> = graph.successors(1).collect();
        succ.sort_unstable();
        assert_eq!(succ, vec![2, 3]);
        assert_eq!(graph.successor_types(2).and_then(|m| m.get(&3)), Some(&well_known::IS_A));
    }

    #[test]
    fn test_leaf_is_absent() {
        let graph = build_adjacency(&[make_is_a(1, 2)]);

        assert!(!graph.contains_source(2));
        assert_eq!(graph.successors(2).count(), 0);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = build_adjacency(&[make_is_a(1, 2), make_is_a(1, 2)]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_build_is_order_independent_and_idempotent() {
        let rels = vec![make_is_a(1, 2), make_is_a(2, 3), make_is_a(1, 3)];
        let reversed: Vec<_> = rels.iter().rev().cloned().collect();

        assert_eq!(build_adjacency(&rels), build_adjacency(&rels));
        assert_eq!(build_adjacency(&rels), build_adjacency(&reversed));
    }
}
