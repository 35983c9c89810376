//! RF2 description rows.

use crate::{CaseSignificance, DescriptionType, SctId};

/// A row of `sct2_Description_*.txt`: one human-readable term for a concept.
///
/// A release (a Full release in particular) may contain several versions of
/// the same description. Versions are told apart by
/// [`version_key`](Self::version_key) and `effective_time`.
///
/// ```
/// use snomed_types::{Rf2Description, DescriptionType};
///
/// let description = Rf2Description {
///     id: 754786014,
///     effective_time: 20020131,
///     active: true,
///     module_id: 900000000000207008,
///     concept_id: 73211009,
///     language_code: "en".to_string(),
///     type_id: DescriptionType::SYNONYM_ID,
///     term: "Diabetes mellitus".to_string(),
///     case_significance_id: 900000000000448009,
/// };
///
/// assert!(description.is_synonym());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2Description {
    /// Description SCTID.
    pub id: SctId,
    /// Effective date, YYYYMMDD.
    pub effective_time: u32,
    /// Whether the description is active.
    pub active: bool,
    /// Owning module.
    pub module_id: SctId,
    /// Concept this term describes.
    pub concept_id: SctId,
    /// ISO 639-1 language code.
    pub language_code: String,
    /// FSN, synonym or definition.
    pub type_id: SctId,
    /// The term text.
    pub term: String,
    /// Case significance of `term`.
    pub case_significance_id: SctId,
}

impl Rf2Description {
    /// Description type, or `None` for an unknown id.
    pub fn description_type(&self) -> Option<DescriptionType> {
        DescriptionType::from_id(self.type_id)
    }

    /// Returns true for a fully specified name.
    pub fn is_fsn(&self) -> bool {
        self.type_id == DescriptionType::FSN_ID
    }

    /// Returns true for a synonym.
    pub fn is_synonym(&self) -> bool {
        self.type_id == DescriptionType::SYNONYM_ID
    }

    /// Case significance, or `None` for an unknown id.
    pub fn case_significance(&self) -> Option<CaseSignificance> {
        CaseSignificance::from_id(self.case_significance_id)
    }

    /// Key identifying the versions of one description.
    pub fn version_key(&self) -> (SctId, SctId) {
        (self.id, self.case_significance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_description(type_id: SctId) -> Rf2Description {
        Rf2Description {
            id: 754786014,
            effective_time: 20020131,
            active: true,
            module_id: 900000000000207008,
            concept_id: 73211009,
            language_code: "en".to_string(),
            type_id,
            term: "Diabetes mellitus (disorder)".to_string(),
            case_significance_id: CaseSignificance::CASE_INSENSITIVE_ID,
        }
    }

    #[test]
    fn test_fsn_and_synonym() {
        let fsn = make_description(DescriptionType::FSN_ID);
        assert!(fsn.is_fsn());
        assert!(!fsn.is_synonym());

        let synonym = make_description(DescriptionType::SYNONYM_ID);
        assert!(synonym.is_synonym());
        assert_eq!(synonym.description_type(), Some(DescriptionType::Synonym));
    }

    #[test]
    fn test_version_key() {
        let desc = make_description(DescriptionType::SYNONYM_ID);
        assert_eq!(
            desc.version_key(),
            (754786014, CaseSignificance::CASE_INSENSITIVE_ID)
        );
        assert_eq!(
            desc.case_significance(),
            Some(CaseSignificance::CaseInsensitive)
        );
    }
}
