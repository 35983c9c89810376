//! # snomed-sqlite
//!
//! SQLite storage for a SNOMED CT release and its subsumption closure.
//!
//! [`SnomedDatabase`] writes the RF2 record tables in batched transactions,
//! reads them back for a later closure run, and materializes a
//! [`ClosureMap`](snomed_closure::ClosureMap) as the `TransitiveClosure`
//! table with its indexes and the `Subsumption` view.
//!
//! ```
//! use snomed_closure::{build_adjacency, compute_closure, Strategy};
//! use snomed_sqlite::SnomedDatabase;
//!
//! let mut db = SnomedDatabase::in_memory().unwrap();
//! let relationships = db.read_relationships().unwrap();
//! let closure = compute_closure(&build_adjacency(&relationships), Strategy::Parallel).unwrap();
//! assert_eq!(db.materialize_closure(&closure).unwrap(), 0);
//! ```

#![warn(missing_docs)]

mod database;
mod error;
mod schema;

pub use database::{DatabaseConfig, SnomedDatabase, SubsumptionRow};
pub use error::{StoreError, StoreResult};
pub use schema::Table;
