//! Coded values used by RF2 records.
//!
//! Each enum maps one-to-one onto a small set of metadata concept ids.
//! The raw ids stay available as associated constants so callers can match
//! against record fields without converting first.

use crate::SctId;

macro_rules! coded_value {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $const_name:ident : $id:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            $(
                #[doc = concat!("SCTID for [`", stringify!($name), "::", stringify!($variant), "`].")]
                pub const $const_name: SctId = $id;
            )+

            /// Looks up the value for a metadata concept id.
            ///
            /// Returns `None` if the id is not one of this enum's concepts.
            pub fn from_id(id: SctId) -> Option<Self> {
                match id {
                    $( Self::$const_name => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Returns the metadata concept id for this value.
            pub fn to_id(self) -> SctId {
                match self {
                    $( Self::$variant => Self::$const_name, )+
                }
            }
        }
    };
}

coded_value! {
    /// Whether a concept is primitive or fully defined.
    ///
    /// ```
    /// use snomed_types::DefinitionStatus;
    ///
    /// assert_eq!(DefinitionStatus::from_id(900000000000074008), Some(DefinitionStatus::Primitive));
    /// ```
    pub enum DefinitionStatus {
        /// Necessary conditions only.
        Primitive = PRIMITIVE_ID: 900000000000074008,
        /// Necessary and sufficient conditions.
        FullyDefined = FULLY_DEFINED_ID: 900000000000073002,
    }
}

coded_value! {
    /// Description type: FSN, synonym or text definition.
    ///
    /// ```
    /// use snomed_types::DescriptionType;
    ///
    /// assert_eq!(DescriptionType::from_id(900000000000013009), Some(DescriptionType::Synonym));
    /// ```
    pub enum DescriptionType {
        /// Fully specified name, carries a semantic tag.
        Fsn = FSN_ID: 900000000000003001,
        /// Synonym. Preferred terms are synonyms.
        Synonym = SYNONYM_ID: 900000000000013009,
        /// Text definition.
        Definition = DEFINITION_ID: 900000000000550004,
    }
}

coded_value! {
    /// Case significance of a description term.
    pub enum CaseSignificance {
        /// Entire term case insensitive.
        CaseInsensitive = CASE_INSENSITIVE_ID: 900000000000448009,
        /// Entire term case sensitive.
        EntireTermCaseSensitive = ENTIRE_TERM_CASE_SENSITIVE_ID: 900000000000017005,
        /// Only the initial character is case sensitive.
        InitialCharacterCaseSensitive = INITIAL_CHAR_CASE_SENSITIVE_ID: 900000000000020002,
    }
}

coded_value! {
    /// Stated, inferred or additional relationship.
    pub enum CharacteristicType {
        /// As authored.
        Stated = STATED_ID: 900000000000010007,
        /// Produced by the classifier.
        Inferred = INFERRED_ID: 900000000000011006,
        /// Additional, non-defining.
        Additional = ADDITIONAL_ID: 900000000000227009,
    }
}

coded_value! {
    /// Relationship quantifier.
    pub enum ModifierType {
        /// Some.
        Existential = EXISTENTIAL_ID: 900000000000451002,
        /// All.
        Universal = UNIVERSAL_ID: 900000000000450001,
    }
}

coded_value! {
    /// Acceptability of a description in a language reference set.
    ///
    /// ```
    /// use snomed_types::Acceptability;
    ///
    /// assert_eq!(Acceptability::from_id(900000000000548007), Some(Acceptability::Preferred));
    /// ```
    pub enum Acceptability {
        /// The preferred term for the dialect.
        Preferred = PREFERRED_ID: 900000000000548007,
        /// Acceptable but not preferred.
        Acceptable = ACCEPTABLE_ID: 900000000000549004,
    }
}
