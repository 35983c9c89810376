//! Table, index and view definitions.
//!
//! Column names follow the RF2 headers in PascalCase. Tables carry no
//! primary key: a Full release holds several versions of each component
//! under the same id.

use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreResult;

/// Tables written by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Concept rows.
    Concept,
    /// Description rows.
    Description,
    /// Relationship rows.
    Relationship,
    /// Language refset rows.
    LanguageRefset,
    /// Materialized `(SourceId, DestinationId)` closure pairs.
    TransitiveClosure,
}

impl Table {
    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::Description => "Description",
            Self::Relationship => "Relationship",
            Self::LanguageRefset => "LanguageRefset",
            Self::TransitiveClosure => "TransitiveClosure",
        }
    }
}

const CREATE_RECORD_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS Concept (
        Id INTEGER NOT NULL,
        EffectiveTime INTEGER NOT NULL,
        Active INTEGER NOT NULL,
        ModuleId INTEGER NOT NULL,
        DefinitionStatusId INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS Description (
        Id INTEGER NOT NULL,
        EffectiveTime INTEGER NOT NULL,
        Active INTEGER NOT NULL,
        ModuleId INTEGER NOT NULL,
        ConceptId INTEGER NOT NULL,
        LanguageCode TEXT NOT NULL,
        TypeId INTEGER NOT NULL,
        Term TEXT NOT NULL,
        CaseSignificanceId INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS Relationship (
        Id INTEGER NOT NULL,
        EffectiveTime INTEGER NOT NULL,
        Active INTEGER NOT NULL,
        ModuleId INTEGER NOT NULL,
        SourceId INTEGER NOT NULL,
        DestinationId INTEGER NOT NULL,
        RelationshipGroup INTEGER NOT NULL,
        TypeId INTEGER NOT NULL,
        CharacteristicTypeId INTEGER NOT NULL,
        ModifierId INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS LanguageRefset (
        Id TEXT NOT NULL,
        EffectiveTime INTEGER NOT NULL,
        Active INTEGER NOT NULL,
        ModuleId INTEGER NOT NULL,
        RefsetId INTEGER NOT NULL,
        ReferencedComponentId INTEGER NOT NULL,
        AcceptabilityId INTEGER NOT NULL
    );";

const CREATE_CLOSURE_STAGING: &str = "
    DROP TABLE IF EXISTS TransitiveClosureStaging;
    CREATE TABLE TransitiveClosureStaging (
        SourceId INTEGER NOT NULL,
        DestinationId INTEGER NOT NULL
    );";

const PUBLISH_CLOSURE_STAGING: &str = "
    DROP VIEW IF EXISTS Subsumption;
    DROP TABLE IF EXISTS TransitiveClosure;
    ALTER TABLE TransitiveClosureStaging RENAME TO TransitiveClosure;";

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_relationship_sourceid ON Relationship(SourceId)",
    "CREATE INDEX IF NOT EXISTS idx_relationship_destinationid ON Relationship(DestinationId)",
    "CREATE INDEX IF NOT EXISTS idx_transitiveclosure_sourceid ON TransitiveClosure(SourceId)",
    "CREATE INDEX IF NOT EXISTS idx_transitiveclosure_destinationid ON TransitiveClosure(DestinationId)",
    "CREATE INDEX IF NOT EXISTS idx_description_conceptid ON Description(ConceptId)",
];

const CREATE_SUBSUMPTION_VIEW: &str = "
    CREATE VIEW IF NOT EXISTS Subsumption AS
    SELECT tc.SourceId, ds.Term AS SourceTerm, tc.DestinationId, dt.Term AS TargetTerm
    FROM TransitiveClosure tc
    LEFT JOIN Description ds ON tc.SourceId = ds.ConceptId
    LEFT JOIN Description dt ON tc.DestinationId = dt.ConceptId";

pub(crate) const INSERT_CONCEPT: &str = "INSERT INTO Concept
    (Id, EffectiveTime, Active, ModuleId, DefinitionStatusId)
    VALUES (?1, ?2, ?3, ?4, ?5)";

pub(crate) const INSERT_DESCRIPTION: &str = "INSERT INTO Description
    (Id, EffectiveTime, Active, ModuleId, ConceptId, LanguageCode, TypeId, Term, CaseSignificanceId)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

pub(crate) const INSERT_RELATIONSHIP: &str = "INSERT INTO Relationship
    (Id, EffectiveTime, Active, ModuleId, SourceId, DestinationId, RelationshipGroup, TypeId,
     CharacteristicTypeId, ModifierId)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

pub(crate) const INSERT_LANGUAGE_REFSET: &str = "INSERT INTO LanguageRefset
    (Id, EffectiveTime, Active, ModuleId, RefsetId, ReferencedComponentId, AcceptabilityId)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub(crate) const INSERT_CLOSURE_PAIR: &str =
    "INSERT INTO TransitiveClosureStaging (SourceId, DestinationId) VALUES (?1, ?2)";

/// Creates the four record tables.
pub(crate) fn create_record_tables(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(CREATE_RECORD_TABLES)?;
    Ok(())
}

/// Creates an empty staging table for closure pairs, discarding any
/// leftover from an earlier failed run.
pub(crate) fn create_closure_staging(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(CREATE_CLOSURE_STAGING)?;
    Ok(())
}

/// Replaces the closure table with the staging table. The view and the
/// closure indexes go with the old table.
pub(crate) fn publish_closure_staging(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(PUBLISH_CLOSURE_STAGING)?;
    Ok(())
}

/// Creates lookup indexes on the relationship, description and closure
/// tables.
pub(crate) fn create_indexes(conn: &Connection) -> StoreResult<()> {
    for sql in INDEXES {
        conn.execute(sql, [])?;
    }
    debug!(count = INDEXES.len(), "indexes created");
    Ok(())
}

/// Creates the `Subsumption` view over the closure table.
pub(crate) fn create_subsumption_view(conn: &Connection) -> StoreResult<()> {
    conn.execute(CREATE_SUBSUMPTION_VIEW, [])?;
    Ok(())
}
