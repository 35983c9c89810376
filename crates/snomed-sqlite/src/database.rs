//! The SQLite database a release is converted into.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::{params, CachedStatement, Connection, OptionalExtension};
use snomed_closure::ClosureMap;
use snomed_types::{Rf2Concept, Rf2Description, Rf2LanguageRefsetMember, Rf2Relationship, SctId};
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::schema::{self, Table};

/// Write settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Rows per committed transaction.
    pub batch_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { batch_size: 10_000 }
    }
}

/// One row of the `Subsumption` view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsumptionRow {
    /// The subsumed concept.
    pub source_id: SctId,
    /// A description term of the source, if it has any.
    pub source_term: Option<String>,
    /// The ancestor concept.
    pub destination_id: SctId,
    /// A description term of the ancestor, if it has any.
    pub target_term: Option<String>,
}

/// A SQLite database holding RF2 records and their closure.
pub struct SnomedDatabase {
    conn: Connection,
    path: Option<PathBuf>,
    config: DatabaseConfig,
}

impl SnomedDatabase {
    /// Creates a fresh database at `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns an error if the old file cannot be removed or the schema
    /// cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::create_with_config(path, DatabaseConfig::default())
    }

    /// Like [`create`](Self::create) with explicit settings.
    pub fn create_with_config<P: AsRef<Path>>(
        path: P,
        config: DatabaseConfig,
    ) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            debug!(path = %path.display(), "removing existing database");
            fs::remove_file(path)?;
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
            config,
        };
        db.initialize()?;
        info!(path = %path.display(), "database created");
        Ok(db)
    }

    /// Opens an existing database.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if `path` does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::NotFound {
                path: path.display().to_string(),
            });
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
            config: DatabaseConfig::default(),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Creates an in-memory database (useful for testing).
    pub fn in_memory() -> StoreResult<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: None,
            config: DatabaseConfig::default(),
        };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> StoreResult<()> {
        // Best effort; in-memory databases refuse WAL.
        for (pragma, value) in [("journal_mode", "WAL"), ("synchronous", "NORMAL")] {
            if let Err(err) = self.conn.pragma_update(None, pragma, value) {
                debug!(pragma, value, error = %err, "pragma not applied");
            }
        }
        schema::create_record_tables(&self.conn)
    }

    /// Replaces the write settings.
    pub fn with_config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    /// The database file, or `None` in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Inserts concept rows.
    #[instrument(skip_all, fields(rows = concepts.len()))]
    pub fn write_concepts(&mut self, concepts: &[Rf2Concept]) -> StoreResult<usize> {
        self.insert_batched(Table::Concept, schema::INSERT_CONCEPT, concepts, |stmt, c| {
            stmt.execute(params![
                c.id,
                c.effective_time,
                c.active,
                c.module_id,
                c.definition_status_id
            ])
        })
    }

    /// Inserts description rows.
    #[instrument(skip_all, fields(rows = descriptions.len()))]
    pub fn write_descriptions(&mut self, descriptions: &[Rf2Description]) -> StoreResult<usize> {
        self.insert_batched(
            Table::Description,
            schema::INSERT_DESCRIPTION,
            descriptions,
            |stmt, d| {
                stmt.execute(params![
                    d.id,
                    d.effective_time,
                    d.active,
                    d.module_id,
                    d.concept_id,
                    d.language_code,
                    d.type_id,
                    d.term,
                    d.case_significance_id
                ])
            },
        )
    }

    /// Inserts relationship rows.
    #[instrument(skip_all, fields(rows = relationships.len()))]
    pub fn write_relationships(&mut self, relationships: &[Rf2Relationship]) -> StoreResult<usize> {
        self.insert_batched(
            Table::Relationship,
            schema::INSERT_RELATIONSHIP,
            relationships,
            |stmt, r| {
                stmt.execute(params![
                    r.id,
                    r.effective_time,
                    r.active,
                    r.module_id,
                    r.source_id,
                    r.destination_id,
                    r.relationship_group,
                    r.type_id,
                    r.characteristic_type_id,
                    r.modifier_id
                ])
            },
        )
    }

    /// Inserts language refset rows.
    #[instrument(skip_all, fields(rows = members.len()))]
    pub fn write_language_refsets(
        &mut self,
        members: &[Rf2LanguageRefsetMember],
    ) -> StoreResult<usize> {
        self.insert_batched(
            Table::LanguageRefset,
            schema::INSERT_LANGUAGE_REFSET,
            members,
            |stmt, m| {
                stmt.execute(params![
                    m.id,
                    m.effective_time,
                    m.active,
                    m.module_id,
                    m.refset_id,
                    m.referenced_component_id,
                    m.acceptability_id
                ])
            },
        )
    }

    fn insert_batched<T, F>(
        &mut self,
        table: Table,
        sql: &str,
        rows: &[T],
        bind: F,
    ) -> StoreResult<usize>
    where
        F: Fn(&mut CachedStatement<'_>, &T) -> rusqlite::Result<usize>,
    {
        let started = Instant::now();
        let batch_size = self.config.batch_size.max(1);

        for chunk in rows.chunks(batch_size) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(sql)?;
                for row in chunk {
                    bind(&mut stmt, row)?;
                }
            }
            tx.commit()?;
        }

        debug!(
            table = table.name(),
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rows written"
        );
        Ok(rows.len())
    }

    /// Reads every concept row.
    pub fn read_concepts(&self) -> StoreResult<Vec<Rf2Concept>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, EffectiveTime, Active, ModuleId, DefinitionStatusId FROM Concept",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Rf2Concept {
                id: row.get(0)?,
                effective_time: row.get(1)?,
                active: row.get(2)?,
                module_id: row.get(3)?,
                definition_status_id: row.get(4)?,
            })
        })?;
        let concepts = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(concepts)
    }

    /// Reads every description row.
    pub fn read_descriptions(&self) -> StoreResult<Vec<Rf2Description>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, EffectiveTime, Active, ModuleId, ConceptId, LanguageCode, TypeId, Term,
                    CaseSignificanceId
             FROM Description",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Rf2Description {
                id: row.get(0)?,
                effective_time: row.get(1)?,
                active: row.get(2)?,
                module_id: row.get(3)?,
                concept_id: row.get(4)?,
                language_code: row.get(5)?,
                type_id: row.get(6)?,
                term: row.get(7)?,
                case_significance_id: row.get(8)?,
            })
        })?;
        let descriptions = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(descriptions)
    }

    /// Reads every relationship row.
    pub fn read_relationships(&self) -> StoreResult<Vec<Rf2Relationship>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, EffectiveTime, Active, ModuleId, SourceId, DestinationId,
                    RelationshipGroup, TypeId, CharacteristicTypeId, ModifierId
             FROM Relationship",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Rf2Relationship {
                id: row.get(0)?,
                effective_time: row.get(1)?,
                active: row.get(2)?,
                module_id: row.get(3)?,
                source_id: row.get(4)?,
                destination_id: row.get(5)?,
                relationship_group: row.get(6)?,
                type_id: row.get(7)?,
                characteristic_type_id: row.get(8)?,
                modifier_id: row.get(9)?,
            })
        })?;
        let relationships = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(relationships)
    }

    /// Reads every language refset row.
    pub fn read_language_refsets(&self) -> StoreResult<Vec<Rf2LanguageRefsetMember>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, EffectiveTime, Active, ModuleId, RefsetId, ReferencedComponentId,
                    AcceptabilityId
             FROM LanguageRefset",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Rf2LanguageRefsetMember {
                id: row.get(0)?,
                effective_time: row.get(1)?,
                active: row.get(2)?,
                module_id: row.get(3)?,
                refset_id: row.get(4)?,
                referenced_component_id: row.get(5)?,
                acceptability_id: row.get(6)?,
            })
        })?;
        let members = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    /// Replaces the closure table with `closure`, then creates the indexes
    /// and the `Subsumption` view. Returns the number of pairs written.
    ///
    /// Pairs are written to a staging table first. The previous closure
    /// table and view stay in place until every batch has committed, so a
    /// failed write leaves them untouched.
    #[instrument(skip_all, fields(pairs = closure.pair_count()))]
    pub fn materialize_closure(&mut self, closure: &ClosureMap) -> StoreResult<usize> {
        let started = Instant::now();
        let batch_size = self.config.batch_size.max(1);

        schema::create_closure_staging(&self.conn)?;

        let mut edges = closure.edges().peekable();
        let mut written = 0;
        while edges.peek().is_some() {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(schema::INSERT_CLOSURE_PAIR)?;
                for (source, destination) in edges.by_ref().take(batch_size) {
                    stmt.execute(params![source, destination])?;
                    written += 1;
                }
            }
            tx.commit()?;
        }

        let tx = self.conn.transaction()?;
        schema::publish_closure_staging(&tx)?;
        schema::create_indexes(&tx)?;
        schema::create_subsumption_view(&tx)?;
        tx.commit()?;

        info!(
            pairs = written,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "closure table materialized"
        );
        Ok(written)
    }

    /// Number of rows in `table`; zero if the table does not exist yet.
    pub fn row_count(&self, table: Table) -> StoreResult<u64> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.name()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(0);
        }

        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let count: u64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of materialized closure pairs.
    pub fn closure_pair_count(&self) -> StoreResult<u64> {
        self.row_count(Table::TransitiveClosure)
    }

    /// Materialized ancestors of `id`, ascending.
    pub fn ancestors(&self, id: SctId) -> StoreResult<Vec<SctId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DestinationId FROM TransitiveClosure WHERE SourceId = ?1 ORDER BY DestinationId",
        )?;
        let rows = stmt.query_map([id], |row| row.get(0))?;
        let ids = rows.collect::<rusqlite::Result<Vec<SctId>>>()?;
        Ok(ids)
    }

    /// Rows of the `Subsumption` view for one source concept.
    pub fn subsumption_rows(&self, source_id: SctId) -> StoreResult<Vec<SubsumptionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT SourceId, SourceTerm, DestinationId, TargetTerm
             FROM Subsumption WHERE SourceId = ?1
             ORDER BY DestinationId, SourceTerm, TargetTerm",
        )?;
        let rows = stmt.query_map([source_id], |row| {
            Ok(SubsumptionRow {
                source_id: row.get(0)?,
                source_term: row.get(1)?,
                destination_id: row.get(2)?,
                target_term: row.get(3)?,
            })
        })?;
        let view = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(view)
    }
}

impl std::fmt::Debug for SnomedDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnomedDatabase")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use snomed_closure::{build_adjacency, compute_closure, Strategy};
    use snomed_types::{well_known, CharacteristicType, ModifierType};
    use tempfile::TempDir;

    fn make_relationship(source: SctId, destination: SctId, active: bool) -> Rf2Relationship {
        Rf2Relationship {
            id: 100000028,
            effective_time: 20200131,
            active,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            source_id: source,
            destination_id: destination,
            relationship_group: 0,
            type_id: well_known::IS_A,
            characteristic_type_id: CharacteristicType::INFERRED_ID,
            modifier_id: ModifierType::EXISTENTIAL_ID,
        }
    }

    fn make_concept(id: SctId) -> Rf2Concept {
        Rf2Concept {
            id,
            effective_time: 20200131,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            definition_status_id: 900000000000074008,
        }
    }

    #[test]
    fn test_relationships_roundtrip() {
        let mut db = SnomedDatabase::in_memory().unwrap();
        let rels = vec![
            make_relationship(73211009, 362969004, true),
            make_relationship(well_known::CLINICAL_FINDING, well_known::SNOMED_CT_ROOT, false),
        ];

        assert_eq!(db.write_relationships(&rels).unwrap(), 2);
        assert_eq!(db.read_relationships().unwrap(), rels);
        assert_eq!(db.row_count(Table::Relationship).unwrap(), 2);
    }

    #[test]
    fn test_large_ids_survive_storage() {
        let mut db = SnomedDatabase::in_memory().unwrap();
        let concept = Rf2Concept {
            module_id: 999_999_999_999_999_999,
            ..make_concept(well_known::PREFERRED)
        };

        db.write_concepts(&[concept.clone()]).unwrap();
        assert_eq!(db.read_concepts().unwrap(), vec![concept]);
    }

    #[test]
    fn test_batched_writes_commit_every_row() {
        let mut db = SnomedDatabase::in_memory()
            .unwrap()
            .with_config(DatabaseConfig { batch_size: 3 });
        let concepts: Vec<_> = (0..10).map(|i| make_concept(100_000 + i)).collect();

        assert_eq!(db.write_concepts(&concepts).unwrap(), 10);
        assert_eq!(db.row_count(Table::Concept).unwrap(), 10);
    }

    #[test]
    fn test_materialize_replaces_previous_closure() {
        let mut db = SnomedDatabase::in_memory()
            .unwrap()
            .with_config(DatabaseConfig { batch_size: 2 });

        let first = compute_closure(
            &build_adjacency(&[make_relationship(1, 2, true), make_relationship(2, 3, true)]),
            Strategy::Sequential,
        )
        .unwrap();
        assert_eq!(db.materialize_closure(&first).unwrap(), 3);
        assert_eq!(db.ancestors(1).unwrap(), vec![2, 3]);

        let second = compute_closure(
            &build_adjacency(&[make_relationship(5, 6, true)]),
            Strategy::Sequential,
        )
        .unwrap();
        assert_eq!(db.materialize_closure(&second).unwrap(), 1);
        assert_eq!(db.closure_pair_count().unwrap(), 1);
        assert!(db.ancestors(1).unwrap().is_empty());
    }

    #[test]
    fn test_failed_materialize_keeps_previous_closure() {
        let mut db = SnomedDatabase::in_memory()
            .unwrap()
            .with_config(DatabaseConfig { batch_size: 1 });
        let first = compute_closure(
            &build_adjacency(&[make_relationship(1, 2, true), make_relationship(2, 3, true)]),
            Strategy::Sequential,
        )
        .unwrap();
        db.materialize_closure(&first).unwrap();

        // Ids above i64::MAX cannot be bound, so a batch fails partway.
        let broken: ClosureMap = [
            (5, HashSet::from([6])),
            (u64::MAX, HashSet::from([1])),
            (7, HashSet::from([8])),
        ]
        .into_iter()
        .collect();
        assert!(db.materialize_closure(&broken).is_err());

        assert_eq!(db.closure_pair_count().unwrap(), 3);
        assert_eq!(db.ancestors(1).unwrap(), vec![2, 3]);
        assert_eq!(db.subsumption_rows(1).unwrap().len(), 2);

        let second = compute_closure(
            &build_adjacency(&[make_relationship(5, 6, true)]),
            Strategy::Sequential,
        )
        .unwrap();
        assert_eq!(db.materialize_closure(&second).unwrap(), 1);
        let staging: Option<String> = db
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE name = 'TransitiveClosureStaging'",
                [],
                |row| row.get(0),
            )
            .optional()
            .unwrap();
        assert!(staging.is_none());
    }

    #[test]
    fn test_closure_count_is_zero_before_materialize() {
        let db = SnomedDatabase::in_memory().unwrap();
        assert_eq!(db.closure_pair_count().unwrap(), 0);
    }

    #[test]
    fn test_create_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SnomedSnapshot.db");

        let mut db = SnomedDatabase::create(&path).unwrap();
        db.write_concepts(&[make_concept(well_known::SNOMED_CT_ROOT)])
            .unwrap();
        drop(db);

        let db = SnomedDatabase::create(&path).unwrap();
        assert_eq!(db.row_count(Table::Concept).unwrap(), 0);
        assert_eq!(db.path(), Some(path.as_path()));
    }

    #[test]
    fn test_open_missing_database() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            SnomedDatabase::open(dir.path().join("missing.db")),
            Err(StoreError::NotFound { .. })
        ));
    }
}
