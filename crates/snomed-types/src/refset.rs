//! Language reference set members.
//!
//! A language refset says, per dialect, which descriptions of a concept are
//! preferred and which are merely acceptable. Exactly one synonym per
//! concept is preferred in a given dialect; that synonym is the concept's
//! preferred term.

use crate::{Acceptability, SctId};

/// A row of `der2_cRefset_Language*.txt`.
///
/// | Column | Meaning |
/// |--------|---------|
/// | id | member UUID |
/// | effectiveTime | YYYYMMDD |
/// | active | 0 or 1 |
/// | moduleId | owning module |
/// | refsetId | the dialect, e.g. US English |
/// | referencedComponentId | a description id |
/// | acceptabilityId | preferred or acceptable |
///
/// ```
/// use snomed_types::{Acceptability, Rf2LanguageRefsetMember};
/// use snomed_types::well_known;
///
/// let member = Rf2LanguageRefsetMember {
///     id: "80000001-0000-4000-8000-000000000001".to_string(),
///     effective_time: 20200101,
///     active: true,
///     module_id: well_known::SNOMED_CT_CORE_MODULE,
///     refset_id: well_known::US_ENGLISH_LANG_REFSET,
///     referenced_component_id: 754786014,
///     acceptability_id: Acceptability::PREFERRED_ID,
/// };
///
/// assert!(member.is_preferred());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rf2LanguageRefsetMember {
    /// Member id. RF2 refset member ids are UUIDs, not SCTIDs.
    pub id: String,
    /// Effective date, YYYYMMDD.
    pub effective_time: u32,
    /// Whether the membership is active.
    pub active: bool,
    /// Owning module.
    pub module_id: SctId,
    /// The language reference set (dialect).
    pub refset_id: SctId,
    /// The description this member annotates.
    pub referenced_component_id: SctId,
    /// Preferred or acceptable.
    pub acceptability_id: SctId,
}

impl Rf2LanguageRefsetMember {
    /// Acceptability, or `None` for an unknown id.
    pub fn acceptability(&self) -> Option<Acceptability> {
        Acceptability::from_id(self.acceptability_id)
    }

    /// Returns true if the description is preferred in this dialect.
    pub fn is_preferred(&self) -> bool {
        self.acceptability_id == Acceptability::PREFERRED_ID
    }

    /// Returns true if the description is acceptable but not preferred.
    pub fn is_acceptable(&self) -> bool {
        self.acceptability_id == Acceptability::ACCEPTABLE_ID
    }
}
