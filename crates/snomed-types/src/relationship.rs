//! RF2 relationship rows.

use crate::{well_known, CharacteristicType, ModifierType, SctId};

/// A row of `sct2_Relationship_*.txt`: a typed, directed edge between two
/// concepts.
///
/// IS_A rows (`type_id == 116680003`) assert that `source_id` is a
/// specialization of `destination_id`; they are the edges of the
/// subsumption hierarchy.
///
/// ```
/// use snomed_types::{Rf2Relationship, CharacteristicType};
///
/// let relationship = Rf2Relationship {
///     id: 100000028,
///     effective_time: 20020131,
///     active: true,
///     module_id: 900000000000207008,
///     source_id: 73211009,        // Diabetes mellitus
///     destination_id: 362969004,  // Disorder of endocrine system
///     relationship_group: 0,
///     type_id: 116680003,         // IS_A
///     characteristic_type_id: CharacteristicType::INFERRED_ID,
///     modifier_id: 900000000000451002,
/// };
///
/// assert!(relationship.is_is_a());
/// assert_eq!(relationship.edge(), (73211009, 362969004));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2Relationship {
    /// Relationship SCTID.
    pub id: SctId,
    /// Effective date, YYYYMMDD.
    pub effective_time: u32,
    /// Whether the row is active.
    pub active: bool,
    /// Owning module.
    pub module_id: SctId,
    /// Subject concept.
    pub source_id: SctId,
    /// Object concept.
    pub destination_id: SctId,
    /// Role group, 0 when ungrouped.
    pub relationship_group: u16,
    /// Attribute type, e.g. IS_A or Finding site.
    pub type_id: SctId,
    /// Stated, inferred or additional.
    pub characteristic_type_id: SctId,
    /// Existential or universal.
    pub modifier_id: SctId,
}

impl Rf2Relationship {
    /// SCTID of the IS_A attribute.
    pub const IS_A_TYPE_ID: SctId = well_known::IS_A;

    /// Returns true if this row is an IS_A edge.
    pub fn is_is_a(&self) -> bool {
        self.is_type(Self::IS_A_TYPE_ID)
    }

    /// Returns true if this row has the given attribute type.
    pub fn is_type(&self, type_id: SctId) -> bool {
        self.type_id == type_id
    }

    /// The `(source, destination)` pair this row connects.
    pub fn edge(&self) -> (SctId, SctId) {
        (self.source_id, self.destination_id)
    }

    /// Returns true for a row pointing back at its own source.
    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.destination_id
    }

    /// Characteristic type, or `None` for an unknown id.
    pub fn characteristic_type(&self) -> Option<CharacteristicType> {
        CharacteristicType::from_id(self.characteristic_type_id)
    }

    /// Returns true if the row was produced by the classifier.
    pub fn is_inferred(&self) -> bool {
        self.characteristic_type_id == CharacteristicType::INFERRED_ID
    }

    /// Returns true if the row was authored.
    pub fn is_stated(&self) -> bool {
        self.characteristic_type_id == CharacteristicType::STATED_ID
    }

    /// Modifier, or `None` for an unknown id.
    pub fn modifier_type(&self) -> Option<ModifierType> {
        ModifierType::from_id(self.modifier_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_relationship(source_id: SctId, destination_id: SctId, type_id: SctId) -> Rf2Relationship {
        Rf2Relationship {
            id: 100000028,
            effective_time: 20020131,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            source_id,
            destination_id,
            relationship_group: 0,
            type_id,
            characteristic_type_id: CharacteristicType::INFERRED_ID,
            modifier_id: ModifierType::EXISTENTIAL_ID,
        }
    }

    #[test]
    fn test_is_a_relationship() {
        let rel = make_relationship(73211009, 362969004, well_known::IS_A);
        assert!(rel.is_is_a());
        assert!(rel.is_inferred());
        assert!(!rel.is_stated());
        assert_eq!(rel.modifier_type(), Some(ModifierType::Existential));
    }

    #[test]
    fn test_attribute_relationship_is_not_is_a() {
        let rel = make_relationship(73211009, 113331007, well_known::FINDING_SITE);
        assert!(!rel.is_is_a());
        assert!(rel.is_type(well_known::FINDING_SITE));
    }

    #[test]
    fn test_edge_and_self_loop() {
        let rel = make_relationship(1, 2, well_known::IS_A);
        assert_eq!(rel.edge(), (1, 2));
        assert!(!rel.is_self_loop());
        assert!(make_relationship(5, 5, well_known::IS_A).is_self_loop());
    }
}
