//! `snomed-closure` binary.
//!
//! # Commands
//!
//! - `convert`: load an RF2 release into a SQLite database and, for a
//!   Snapshot, materialize the IS_A transitive closure.
//! - `closure`: rebuild the closure table of an existing database.
//!
//! Exit code 1 on any error.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

use commands::closure::{handle_closure, ClosureCommandArgs};
use commands::convert::{handle_convert, ConvertArgs};

/// SNOMED CT release to SQLite converter with subsumption closure
#[derive(Debug, Parser)]
#[command(name = "snomed-closure")]
#[command(version)]
#[command(about = "Convert SNOMED CT RF2 releases to SQLite and build the IS_A transitive closure")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert an RF2 release directory into a SQLite database
    Convert(ConvertArgs),
    /// Rebuild the closure table of an existing database
    Closure(ClosureCommandArgs),
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert(args) => handle_convert(args).map(|path| {
            tracing::info!("database written to {}", path.display());
        }),
        Commands::Closure(args) => handle_closure(args).map(|pairs| {
            tracing::info!("{} closure pairs stored", pairs);
        }),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
