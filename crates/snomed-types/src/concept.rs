//! RF2 concept rows.

use crate::{DefinitionStatus, SctId};

/// A row of `sct2_Concept_*.txt`.
///
/// ```
/// use snomed_types::{Rf2Concept, DefinitionStatus};
///
/// let concept = Rf2Concept {
///     id: 73211009,
///     effective_time: 20020131,
///     active: true,
///     module_id: 900000000000207008,
///     definition_status_id: DefinitionStatus::PRIMITIVE_ID,
/// };
///
/// assert!(concept.is_primitive());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2Concept {
    /// Concept SCTID.
    pub id: SctId,
    /// Effective date, YYYYMMDD.
    pub effective_time: u32,
    /// Whether the concept is active in this row's version.
    pub active: bool,
    /// Owning module.
    pub module_id: SctId,
    /// Primitive or fully defined.
    pub definition_status_id: SctId,
}

impl Rf2Concept {
    /// Definition status, or `None` for an unknown id.
    pub fn definition_status(&self) -> Option<DefinitionStatus> {
        DefinitionStatus::from_id(self.definition_status_id)
    }

    /// Returns true if the concept is primitively defined.
    pub fn is_primitive(&self) -> bool {
        self.definition_status_id == DefinitionStatus::PRIMITIVE_ID
    }

    /// Returns true if the concept is fully defined.
    pub fn is_fully_defined(&self) -> bool {
        self.definition_status_id == DefinitionStatus::FULLY_DEFINED_ID
    }
}
