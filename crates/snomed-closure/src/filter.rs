//! Selecting the relationships that make up the subsumption hierarchy.

use std::collections::{HashMap, HashSet};

use snomed_types::{Rf2Concept, Rf2Description, Rf2LanguageRefsetMember, Rf2Relationship, SctId};
use tracing::debug;

use crate::config::ClosureConfig;

/// How much of the release the filter consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Hierarchy type only; inactive rows are kept.
    Basic,
    /// Hierarchy type and active rows.
    #[default]
    Active,
    /// Active rows between active concepts whose destination has a
    /// preferred term.
    Strict,
}

/// Picks the relationship rows that contribute hierarchy edges.
///
/// ```
/// use snomed_closure::{ClosureConfig, FilterMode, RelationshipFilter};
///
/// let filter = RelationshipFilter::active(&ClosureConfig::default());
/// assert_eq!(filter.mode(), FilterMode::Active);
/// ```
#[derive(Debug, Clone)]
pub struct RelationshipFilter {
    mode: FilterMode,
    is_a_type_id: SctId,
    active_concepts: HashSet<SctId>,
    preferred_concepts: HashSet<SctId>,
}

impl RelationshipFilter {
    /// Keeps rows of the hierarchy type, active or not.
    pub fn basic(config: &ClosureConfig) -> Self {
        Self::typed(FilterMode::Basic, config)
    }

    /// Keeps active rows of the hierarchy type.
    pub fn active(config: &ClosureConfig) -> Self {
        Self::typed(FilterMode::Active, config)
    }

    /// Keeps active rows of the hierarchy type whose endpoints are active
    /// concepts and whose destination has a preferred term.
    pub fn strict(
        config: &ClosureConfig,
        concepts: &[Rf2Concept],
        descriptions: &[Rf2Description],
        language_refsets: &[Rf2LanguageRefsetMember],
    ) -> Self {
        let active_concepts: HashSet<SctId> = concepts
            .iter()
            .filter(|c| c.active)
            .map(|c| c.id)
            .collect();
        let preferred_concepts: HashSet<SctId> =
            resolve_preferred_terms(config, descriptions, language_refsets)
                .into_keys()
                .collect();

        debug!(
            active_concepts = active_concepts.len(),
            preferred_concepts = preferred_concepts.len(),
            "strict filter context built"
        );

        Self {
            mode: FilterMode::Strict,
            is_a_type_id: config.is_a_type_id,
            active_concepts,
            preferred_concepts,
        }
    }

    fn typed(mode: FilterMode, config: &ClosureConfig) -> Self {
        Self {
            mode,
            is_a_type_id: config.is_a_type_id,
            active_concepts: HashSet::new(),
            preferred_concepts: HashSet::new(),
        }
    }

    /// The filter mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Returns true if `rel` is a hierarchy edge under this filter.
    pub fn accepts(&self, rel: &Rf2Relationship) -> bool {
        if !rel.is_type(self.is_a_type_id) {
            return false;
        }
        match self.mode {
            FilterMode::Basic => true,
            FilterMode::Active => rel.active,
            FilterMode::Strict => {
                rel.active
                    && self.active_concepts.contains(&rel.source_id)
                    && self.active_concepts.contains(&rel.destination_id)
                    && self.preferred_concepts.contains(&rel.destination_id)
            }
        }
    }

    /// Returns the accepted rows, in input order.
    pub fn apply<'r>(&self, relationships: &'r [Rf2Relationship]) -> Vec<&'r Rf2Relationship> {
        relationships.iter().filter(|rel| self.accepts(rel)).collect()
    }
}

/// Maps each concept to its preferred synonym.
///
/// Only the latest version of each description (by id and case
/// significance) is considered. It must be an active synonym referenced by
/// an active language refset member with the preferred acceptability. When
/// several dialects prefer different synonyms, the lowest description id
/// wins.
pub fn resolve_preferred_terms<'d>(
    config: &ClosureConfig,
    descriptions: &'d [Rf2Description],
    language_refsets: &[Rf2LanguageRefsetMember],
) -> HashMap<SctId, &'d Rf2Description> {
    let preferred_ids: HashSet<SctId> = language_refsets
        .iter()
        .filter(|m| m.active && m.acceptability_id == config.preferred_acceptability_id)
        .filter(|m| {
            config.language_refset_ids.is_empty()
                || config.language_refset_ids.contains(&m.refset_id)
        })
        .map(|m| m.referenced_component_id)
        .collect();

    let mut latest: HashMap<(SctId, SctId), &Rf2Description> = HashMap::new();
    for desc in descriptions {
        latest
            .entry(desc.version_key())
            .and_modify(|current| {
                if desc.effective_time > current.effective_time {
                    *current = desc;
                }
            })
            .or_insert(desc);
    }

    let mut terms: HashMap<SctId, &Rf2Description> = HashMap::new();
    for desc in latest.into_values() {
        if !desc.active
            || desc.type_id != config.synonym_type_id
            || !preferred_ids.contains(&desc.id)
        {
            continue;
        }
        terms
            .entry(desc.concept_id)
            .and_modify(|current| {
                if desc.id < current.id {
                    *current = desc;
                }
            })
            .or_insert(desc);
    }
    terms
}
