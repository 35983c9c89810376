//! Subcommand handlers and the options they share.

pub mod closure;
pub mod convert;

use std::sync::Arc;

use clap::{Args, ValueEnum};
use snomed_closure::{
    ClosureComputer, ClosureConfig, ClosureMap, CyclePolicy, RelationshipFilter, Strategy,
    TracingProgress,
};
use snomed_sqlite::SnomedDatabase;
use snomed_types::{Rf2Concept, Rf2Description, Rf2LanguageRefsetMember, Rf2Relationship};
use tracing::info;

use crate::error::AppResult;

/// Closure traversal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Worklist traversal on all cores.
    Parallel,
    /// Depth-first traversal on one thread.
    Sequential,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Parallel => Strategy::Parallel,
            StrategyArg::Sequential => Strategy::Sequential,
        }
    }
}

/// Which relationships count as hierarchy edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Every IS_A row, active or not.
    Basic,
    /// Active IS_A rows.
    Active,
    /// Active IS_A rows between active concepts with preferred terms.
    Strict,
}

/// Options controlling the closure run.
#[derive(Debug, Clone, Args)]
pub struct ClosureArgs {
    /// Traversal strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Parallel)]
    pub strategy: StrategyArg,

    /// Relationship filter
    #[arg(long, value_enum, default_value_t = ModeArg::Active)]
    pub mode: ModeArg,

    /// Fail if a concept is its own ancestor
    #[arg(long)]
    pub reject_cycles: bool,
}

impl ClosureArgs {
    fn config(&self) -> ClosureConfig {
        let policy = if self.reject_cycles {
            CyclePolicy::Reject
        } else {
            CyclePolicy::Permit
        };
        ClosureConfig::default().with_cycle_policy(policy)
    }
}

/// The records a closure run may consult.
pub struct ClosureInputs<'a> {
    /// Concept rows; consulted in strict mode only.
    pub concepts: &'a [Rf2Concept],
    /// Description rows; consulted in strict mode only.
    pub descriptions: &'a [Rf2Description],
    /// Language refset rows; consulted in strict mode only.
    pub language_refsets: &'a [Rf2LanguageRefsetMember],
    /// Relationship rows.
    pub relationships: &'a [Rf2Relationship],
}

/// Computes the closure of `inputs` and writes it to `db`.
pub fn build_and_materialize(
    db: &mut SnomedDatabase,
    inputs: ClosureInputs<'_>,
    args: &ClosureArgs,
) -> AppResult<ClosureMap> {
    let config = args.config();
    config.validate()?;

    let filter = match args.mode {
        ModeArg::Basic => RelationshipFilter::basic(&config),
        ModeArg::Active => RelationshipFilter::active(&config),
        ModeArg::Strict => RelationshipFilter::strict(
            &config,
            inputs.concepts,
            inputs.descriptions,
            inputs.language_refsets,
        ),
    };

    let computer =
        ClosureComputer::new(config).with_progress(Arc::new(TracingProgress::default()));
    let closure = computer.run(&filter, inputs.relationships, args.strategy.into())?;

    let written = db.materialize_closure(&closure)?;
    info!(
        sources = closure.len(),
        pairs = written,
        mode = ?args.mode,
        strategy = ?args.strategy,
        "subsumption closure stored"
    );
    Ok(closure)
}
