//! Well-known SNOMED CT concept ids used when building the subsumption
//! closure.
//!
//! ```
//! use snomed_types::well_known;
//!
//! assert_eq!(well_known::IS_A, 116680003);
//! assert_eq!(well_known::PREFERRED, 900000000000548007);
//! ```

use crate::SctId;

// =============================================================================
// Hierarchy
// =============================================================================

/// SNOMED CT Concept (SNOMED RT+CTV3) - 138875005. Root of every hierarchy.
pub const SNOMED_CT_ROOT: SctId = 138875005;

/// Clinical finding (finding) - 404684003.
pub const CLINICAL_FINDING: SctId = 404684003;

/// Procedure (procedure) - 71388002.
pub const PROCEDURE: SctId = 71388002;

/// Body structure (body structure) - 123037004.
pub const BODY_STRUCTURE: SctId = 123037004;

/// Substance (substance) - 105590001.
pub const SUBSTANCE: SctId = 105590001;

// =============================================================================
// Relationship types
// =============================================================================

/// Is a (attribute) - 116680003.
///
/// The only relationship type that contributes edges to the subsumption
/// hierarchy.
pub const IS_A: SctId = 116680003;

/// Part of (attribute) - 123005000. A partonomy edge, not a subsumption one.
pub const PART_OF: SctId = 123005000;

/// Finding site (attribute) - 363698007.
pub const FINDING_SITE: SctId = 363698007;

/// Associated morphology (attribute) - 116676008.
pub const ASSOCIATED_MORPHOLOGY: SctId = 116676008;

// =============================================================================
// Description and language metadata
// =============================================================================

/// Synonym (core metadata concept) - 900000000000013009.
pub const SYNONYM: SctId = 900000000000013009;

/// Fully specified name (core metadata concept) - 900000000000003001.
pub const FULLY_SPECIFIED_NAME: SctId = 900000000000003001;

/// Preferred (foundation metadata concept) - 900000000000548007.
pub const PREFERRED: SctId = 900000000000548007;

/// Acceptable (foundation metadata concept) - 900000000000549004.
pub const ACCEPTABLE: SctId = 900000000000549004;

/// US English language reference set - 900000000000509007.
pub const US_ENGLISH_LANG_REFSET: SctId = 900000000000509007;

/// GB English language reference set - 900000000000508004.
pub const GB_ENGLISH_LANG_REFSET: SctId = 900000000000508004;

// =============================================================================
// Modules
// =============================================================================

/// SNOMED CT core module - 900000000000207008.
pub const SNOMED_CT_CORE_MODULE: SctId = 900000000000207008;

/// SNOMED CT model component module - 900000000000012004.
pub const SNOMED_CT_MODEL_COMPONENT_MODULE: SctId = 900000000000012004;
