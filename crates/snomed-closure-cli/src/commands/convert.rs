//! `convert`: RF2 release directory to SQLite database.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use snomed_loader::{discover_rf2_files, format_bytes, LoadConfig, ReleaseKind, Rf2Release};
use snomed_sqlite::{DatabaseConfig, SnomedDatabase};
use tracing::{info, instrument};

use super::{build_and_materialize, ClosureArgs, ClosureInputs};
use crate::error::{AppError, AppResult};

/// Arguments for `convert`.
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Unpacked RF2 release directory
    #[arg(env = "SNOMED_DATA_PATH")]
    pub release_dir: Option<PathBuf>,

    /// Read the Full release instead of the Snapshot (no closure is built)
    #[arg(long)]
    pub full: bool,

    /// Output database (default: SnomedSnapshot.db or SnomedFull.db in the release directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows per insert transaction
    #[arg(long, default_value_t = 10_000)]
    pub batch_size: usize,

    #[command(flatten)]
    pub closure: ClosureArgs,
}

/// Runs `convert`, returning the database path.
#[instrument(skip_all)]
pub fn handle_convert(args: ConvertArgs) -> AppResult<PathBuf> {
    let started = Instant::now();
    let release_dir = args.release_dir.clone().ok_or(AppError::MissingReleaseDir)?;
    let kind = if args.full {
        ReleaseKind::Full
    } else {
        ReleaseKind::Snapshot
    };

    let files = discover_rf2_files(&release_dir, kind)?;
    info!(
        dir = %release_dir.display(),
        kind = kind.file_token(),
        release_date = files.release_date.as_deref().unwrap_or("unknown"),
        "converting release"
    );
    let release = Rf2Release::load(&files, &LoadConfig::default())?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| release_dir.join(kind.database_name()));
    if output.file_name().is_none() {
        return Err(AppError::InvalidOutput(output));
    }

    let mut db = SnomedDatabase::create_with_config(
        &output,
        DatabaseConfig {
            batch_size: args.batch_size,
        },
    )?;
    db.write_concepts(&release.concepts)?;
    db.write_descriptions(&release.descriptions)?;
    db.write_relationships(&release.relationships)?;
    db.write_language_refsets(&release.language_refsets)?;

    match kind {
        ReleaseKind::Snapshot => {
            build_and_materialize(
                &mut db,
                ClosureInputs {
                    concepts: &release.concepts,
                    descriptions: &release.descriptions,
                    language_refsets: &release.language_refsets,
                    relationships: &release.relationships,
                },
                &args.closure,
            )?;
        }
        ReleaseKind::Full => {
            info!("full release carries history; skipping closure");
        }
    }
    drop(db);

    let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    info!(
        path = %output.display(),
        size = %format_bytes(size),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "conversion complete"
    );
    Ok(output)
}
