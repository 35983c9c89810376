//! `closure`: rebuild the closure table of an existing database.

use std::path::PathBuf;

use clap::Args;
use snomed_sqlite::SnomedDatabase;
use tracing::{info, instrument};

use super::{build_and_materialize, ClosureArgs, ClosureInputs, ModeArg};
use crate::error::AppResult;

/// Arguments for `closure`.
#[derive(Debug, Clone, Args)]
pub struct ClosureCommandArgs {
    /// Database written by `convert`
    pub database: PathBuf,

    #[command(flatten)]
    pub closure: ClosureArgs,
}

/// Runs `closure`, returning the number of stored pairs.
#[instrument(skip_all)]
pub fn handle_closure(args: ClosureCommandArgs) -> AppResult<u64> {
    let mut db = SnomedDatabase::open(&args.database)?;
    let relationships = db.read_relationships()?;

    // Only the strict filter looks past the relationship table.
    let (concepts, descriptions, language_refsets) = if args.closure.mode == ModeArg::Strict {
        (
            db.read_concepts()?,
            db.read_descriptions()?,
            db.read_language_refsets()?,
        )
    } else {
        (Vec::new(), Vec::new(), Vec::new())
    };
    info!(
        path = %args.database.display(),
        relationships = relationships.len(),
        "rebuilding closure"
    );

    build_and_materialize(
        &mut db,
        ClosureInputs {
            concepts: &concepts,
            descriptions: &descriptions,
            language_refsets: &language_refsets,
            relationships: &relationships,
        },
        &args.closure,
    )?;

    Ok(db.closure_pair_count()?)
}
