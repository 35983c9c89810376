//! # snomed-closure
//!
//! Subsumption graph engine for SNOMED CT.
//!
//! Turns relationship rows into the transitive closure of the "is a"
//! hierarchy in three stages:
//!
//! 1. [`RelationshipFilter`] keeps the rows that are hierarchy edges.
//! 2. [`build_adjacency`] turns them into an [`AdjacencyGraph`].
//! 3. [`ClosureComputer`] computes every concept's ancestors as a
//!    [`ClosureMap`], sequentially or in parallel.
//!
//! ## Example
//!
//! ```rust
//! use snomed_closure::{ClosureComputer, ClosureConfig, RelationshipFilter, Strategy};
//! use snomed_types::{well_known, CharacteristicType, ModifierType, Rf2Relationship};
//!
//! let is_a = |id, source, destination| Rf2Relationship {
//!     id,
//!     effective_time: 20020131,
//!     active: true,
//!     module_id: well_known::SNOMED_CT_CORE_MODULE,
//!     source_id: source,
//!     destination_id: destination,
//!     relationship_group: 0,
//!     type_id: well_known::IS_A,
//!     characteristic_type_id: CharacteristicType::INFERRED_ID,
//!     modifier_id: ModifierType::EXISTENTIAL_ID,
//! };
//! let relationships = vec![
//!     is_a(100000028, 73211009, 362969004),
//!     is_a(100001029, 362969004, well_known::CLINICAL_FINDING),
//! ];
//!
//! let config = ClosureConfig::default();
//! let filter = RelationshipFilter::active(&config);
//! let closure = ClosureComputer::new(config)
//!     .run(&filter, &relationships, Strategy::Parallel)
//!     .unwrap();
//!
//! assert!(closure.is_subsumed_by(73211009, well_known::CLINICAL_FINDING));
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): run [`Strategy::Parallel`] on the rayon pool.
//!   Without it the worklist traversal runs on the calling thread.

#![warn(missing_docs)]

mod adjacency;
mod closure;
mod config;
mod error;
mod filter;
mod progress;

pub use adjacency::{build_adjacency, AdjacencyGraph};
pub use closure::{compute_closure, ClosureComputer, ClosureMap, Strategy};
pub use config::{ClosureConfig, CyclePolicy};
pub use error::{ClosureError, ClosureResult};
pub use filter::{resolve_preferred_terms, FilterMode, RelationshipFilter};
pub use progress::{Milestone, NoProgress, ProgressSink, TracingProgress};
