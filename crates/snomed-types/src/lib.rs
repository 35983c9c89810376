//! # snomed-types
//!
//! Record types for the SNOMED CT Release Format 2 (RF2) files that feed the
//! subsumption closure: concepts, descriptions, relationships and language
//! reference set members, plus the coded values and identifiers they use.
//!
//! ## Features
//!
//! - `serde` (default): derives `Serialize`/`Deserialize` on every record.
//!
//! ## Usage
//!
//! ```rust
//! use snomed_types::{Rf2Relationship, CharacteristicType, ModifierType};
//! use snomed_types::well_known;
//!
//! let edge = Rf2Relationship {
//!     id: 100000028,
//!     effective_time: 20020131,
//!     active: true,
//!     module_id: well_known::SNOMED_CT_CORE_MODULE,
//!     source_id: 73211009,
//!     destination_id: 362969004,
//!     relationship_group: 0,
//!     type_id: well_known::IS_A,
//!     characteristic_type_id: CharacteristicType::INFERRED_ID,
//!     modifier_id: ModifierType::EXISTENTIAL_ID,
//! };
//!
//! assert!(edge.is_is_a());
//! ```

#![warn(missing_docs)]

mod concept;
mod description;
mod enums;
pub mod refset;
mod relationship;
pub mod sctid;
pub mod well_known;

pub use concept::Rf2Concept;
pub use description::Rf2Description;
pub use enums::{
    Acceptability, CaseSignificance, CharacteristicType, DefinitionStatus, DescriptionType,
    ModifierType,
};
pub use refset::Rf2LanguageRefsetMember;
pub use relationship::Rf2Relationship;
pub use sctid::SctId;
