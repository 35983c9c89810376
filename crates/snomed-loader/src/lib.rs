//! # snomed-loader
//!
//! Parser for SNOMED CT RF2 distribution files.
//!
//! Finds the concept, description, relationship and language refset files
//! of a Snapshot or Full release and parses them into the record types of
//! [`snomed_types`].
//!
//! ## Example
//!
//! ```ignore
//! use snomed_loader::{discover_rf2_files, LoadConfig, ReleaseKind, Rf2Release};
//!
//! let files = discover_rf2_files("/path/to/SnomedCT_InternationalRF2", ReleaseKind::Snapshot)?;
//! let release = Rf2Release::load(&files, &LoadConfig::default())?;
//! println!("{} relationships", release.relationships.len());
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): parse the file kinds of a release concurrently
//!   with rayon.

#![warn(missing_docs)]

mod concept;
mod description;
mod loader;
pub mod parser;
mod refset;
mod relationship;
mod release;
pub mod types;

pub use description::DescriptionFilter;
pub use loader::{discover_rf2_files, format_bytes};
pub use parser::{Rf2Parser, Rf2Record};
pub use relationship::RelationshipLoadFilter;
pub use release::Rf2Release;
pub use types::{
    DescriptionConfig, LoadConfig, ParseStats, RelationshipConfig, ReleaseKind, Rf2Config,
    Rf2Error, Rf2Files, Rf2Result,
};

pub use snomed_types;
