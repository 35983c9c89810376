//! Error, configuration and file-set types for RF2 loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or parsing RF2 files.
#[derive(Error, Debug)]
pub enum Rf2Error {
    /// I/O error reading an RF2 file.
    #[error("IO error reading RF2 file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV layer error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Field is not a valid SCTID.
    #[error("Invalid SCTID format: {value}")]
    InvalidSctId {
        /// The offending value.
        value: String,
    },

    /// Field is not a YYYYMMDD date.
    #[error("Invalid date format: {value}")]
    InvalidDate {
        /// The offending value.
        value: String,
    },

    /// Field is not `0` or `1`.
    #[error("Invalid boolean value: {value} (expected 0 or 1)")]
    InvalidBoolean {
        /// The offending value.
        value: String,
    },

    /// Field is not an integer.
    #[error("Invalid integer value: {value}")]
    InvalidInteger {
        /// The offending value.
        value: String,
    },

    /// A required field is empty.
    #[error("Missing value for column '{column}' on line {line}")]
    MissingField {
        /// Column name.
        column: &'static str,
        /// 1-based line number, header included.
        line: u64,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A required file is missing from the release.
    #[error("Required RF2 file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// Which file kinds are missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// Header has fewer columns than the record type needs.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Header column name does not match.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// Column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },
}

/// Result type for RF2 operations.
pub type Rf2Result<T> = Result<T, Rf2Error>;

/// Which flavour of RF2 distribution to read.
///
/// A Snapshot holds the current version of every component; a Full release
/// holds every version ever published. Only a Snapshot is a valid input for
/// the subsumption closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReleaseKind {
    /// Current state only.
    #[default]
    Snapshot,
    /// Complete history.
    Full,
}

impl ReleaseKind {
    /// The token RF2 file names carry for this kind.
    pub fn file_token(self) -> &'static str {
        match self {
            Self::Snapshot => "Snapshot",
            Self::Full => "Full",
        }
    }

    /// Default database file name for a conversion of this kind.
    pub fn database_name(self) -> &'static str {
        match self {
            Self::Snapshot => "SnomedSnapshot.db",
            Self::Full => "SnomedFull.db",
        }
    }
}

/// Base configuration applied to every parsed file.
#[derive(Debug, Clone)]
pub struct Rf2Config {
    /// Skip inactive rows.
    pub active_only: bool,
    /// Rows per batch in [`Rf2Parser::parse_batched`](crate::Rf2Parser::parse_batched).
    pub batch_size: usize,
}

impl Default for Rf2Config {
    fn default() -> Self {
        Self {
            active_only: true,
            batch_size: 10_000,
        }
    }
}

impl Rf2Config {
    /// Keeps every row, active or not.
    pub fn all_rows() -> Self {
        Self {
            active_only: false,
            ..Self::default()
        }
    }
}

/// Description-specific filtering.
#[derive(Debug, Clone)]
pub struct DescriptionConfig {
    /// Base configuration.
    pub base: Rf2Config,
    /// Language codes to keep (empty = all).
    pub language_codes: Vec<String>,
    /// Description type ids to keep (empty = all).
    pub type_ids: Vec<u64>,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            base: Rf2Config::all_rows(),
            language_codes: vec![],
            type_ids: vec![],
        }
    }
}

impl DescriptionConfig {
    /// Keeps English FSNs and synonyms.
    pub fn english_terms() -> Self {
        Self {
            base: Rf2Config::default(),
            language_codes: vec!["en".to_string()],
            type_ids: vec![
                snomed_types::DescriptionType::FSN_ID,
                snomed_types::DescriptionType::SYNONYM_ID,
            ],
        }
    }
}

/// Relationship-specific filtering.
#[derive(Debug, Clone)]
pub struct RelationshipConfig {
    /// Base configuration.
    pub base: Rf2Config,
    /// Relationship type ids to keep (empty = all).
    pub type_ids: Vec<u64>,
    /// Characteristic type ids to keep (empty = all).
    pub characteristic_type_ids: Vec<u64>,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            base: Rf2Config::all_rows(),
            type_ids: vec![],
            characteristic_type_ids: vec![],
        }
    }
}

impl RelationshipConfig {
    /// Keeps IS_A rows only, active or not.
    pub fn is_a_only() -> Self {
        Self {
            type_ids: vec![snomed_types::well_known::IS_A],
            ..Self::default()
        }
    }

    /// Keeps inferred rows only.
    pub fn inferred_only() -> Self {
        Self {
            characteristic_type_ids: vec![snomed_types::CharacteristicType::INFERRED_ID],
            ..Self::default()
        }
    }
}

/// Per-kind configuration for loading a whole release.
///
/// The default keeps every row: the database mirrors the release and the
/// closure filter decides for itself what an inactive row means.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Concept file configuration.
    pub concepts: Rf2Config,
    /// Description file configuration.
    pub descriptions: DescriptionConfig,
    /// Relationship file configuration.
    pub relationships: RelationshipConfig,
    /// Language refset file configuration.
    pub language_refsets: Rf2Config,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            concepts: Rf2Config::all_rows(),
            descriptions: DescriptionConfig::default(),
            relationships: RelationshipConfig::default(),
            language_refsets: Rf2Config::all_rows(),
        }
    }
}

/// Statistics from parsing one RF2 file.
#[derive(Debug, Clone, Default)]
pub struct ParseStats {
    /// Data rows read.
    pub total_records: usize,
    /// Rows that passed filters.
    pub filtered_records: usize,
    /// Rows dropped by filters.
    pub skipped_records: usize,
    /// Wall time in milliseconds.
    pub parse_time_ms: u64,
}

impl ParseStats {
    /// Percentage of rows that passed filters.
    pub fn filter_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.filtered_records as f64 / self.total_records as f64) * 100.0
        }
    }
}

/// The RF2 files of one release, as found by
/// [`discover_rf2_files`](crate::discover_rf2_files).
#[derive(Debug, Clone, Default)]
pub struct Rf2Files {
    /// Snapshot or Full.
    pub kind: ReleaseKind,
    /// Concept file.
    pub concept_file: Option<PathBuf>,
    /// Description files, one per language edition.
    pub description_files: Vec<PathBuf>,
    /// Inferred relationship file.
    pub relationship_file: Option<PathBuf>,
    /// Language reference set files.
    pub language_refset_files: Vec<PathBuf>,
    /// Release date from the concept file name (YYYYMMDD).
    pub release_date: Option<String>,
}

impl Rf2Files {
    /// Creates an empty file set for `kind`.
    pub fn new(kind: ReleaseKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Returns true if concept, description and relationship files are present.
    pub fn has_required_files(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// Lists the required file kinds that were not found.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.concept_file.is_none() {
            missing.push("Concept");
        }
        if self.description_files.is_empty() {
            missing.push("Description");
        }
        if self.relationship_file.is_none() {
            missing.push("Relationship");
        }
        missing
    }
}
