//! Engine configuration.

use snomed_types::sctid::is_concept_id;
use snomed_types::{well_known, SctId};

use crate::error::{ClosureError, ClosureResult};

/// What to do when a concept turns out to be its own ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Keep the cycle members in each other's closures.
    #[default]
    Permit,
    /// Fail with [`ClosureError::CycleDetected`].
    Reject,
}

/// Identifiers and limits the engine works with.
///
/// Defaults are the International Edition metadata concepts, so a closure
/// over another typed-edge hierarchy only needs a different
/// [`is_a_type_id`](Self::is_a_type_id).
///
/// ```
/// use snomed_closure::{ClosureConfig, CyclePolicy};
/// use snomed_types::well_known;
///
/// let config = ClosureConfig::default()
///     .with_language_refsets([well_known::GB_ENGLISH_LANG_REFSET])
///     .with_cycle_policy(CyclePolicy::Reject);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureConfig {
    /// Relationship type that forms the hierarchy.
    pub is_a_type_id: SctId,
    /// Acceptability value marking a preferred description.
    pub preferred_acceptability_id: SctId,
    /// Description type a preferred term must have.
    pub synonym_type_id: SctId,
    /// Language refsets consulted for preferred terms (empty = all).
    pub language_refset_ids: Vec<SctId>,
    /// Cycle handling.
    pub cycle_policy: CyclePolicy,
    /// Upper bound on a single concept's closure size.
    pub max_closure_size: Option<usize>,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            is_a_type_id: well_known::IS_A,
            preferred_acceptability_id: well_known::PREFERRED,
            synonym_type_id: well_known::SYNONYM,
            language_refset_ids: Vec::new(),
            cycle_policy: CyclePolicy::Permit,
            max_closure_size: None,
        }
    }
}

impl ClosureConfig {
    /// Sets the hierarchy relationship type.
    pub fn with_is_a_type_id(mut self, id: SctId) -> Self {
        self.is_a_type_id = id;
        self
    }

    /// Sets the preferred acceptability value.
    pub fn with_preferred_acceptability_id(mut self, id: SctId) -> Self {
        self.preferred_acceptability_id = id;
        self
    }

    /// Sets the description type of a preferred term.
    pub fn with_synonym_type_id(mut self, id: SctId) -> Self {
        self.synonym_type_id = id;
        self
    }

    /// Restricts preferred-term resolution to these language refsets.
    pub fn with_language_refsets<I: IntoIterator<Item = SctId>>(mut self, ids: I) -> Self {
        self.language_refset_ids = ids.into_iter().collect();
        self
    }

    /// Sets the cycle policy.
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    /// Bounds the size of any single closure set.
    pub fn with_max_closure_size(mut self, limit: usize) -> Self {
        self.max_closure_size = Some(limit);
        self
    }

    /// Checks that every configured id is a well-formed concept id.
    ///
    /// # Errors
    /// Returns [`ClosureError::InvalidConfiguration`] naming the first bad
    /// field.
    pub fn validate(&self) -> ClosureResult<()> {
        let fields = [
            ("is_a_type_id", self.is_a_type_id),
            ("preferred_acceptability_id", self.preferred_acceptability_id),
            ("synonym_type_id", self.synonym_type_id),
        ];
        let refsets = self
            .language_refset_ids
            .iter()
            .map(|&id| ("language_refset_ids", id));

        for (field, id) in fields.into_iter().chain(refsets) {
            if !is_concept_id(id) {
                return Err(ClosureError::InvalidConfiguration { field, id });
            }
        }
        Ok(())
    }
}
