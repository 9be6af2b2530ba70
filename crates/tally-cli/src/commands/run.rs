use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use super::{headline, tie_breaker, write_artefacts};
use crate::config::load_config;
use crate::input::ElectionDefinition;
use crate::summary::tabulate;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Election definition (YAML, or JSON with a `.json` extension). Repeat to
    /// merge several ballot files of the same election.
    #[arg(long, required = true)]
    pub election: Vec<PathBuf>,
    /// Optional YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for the summary and reports.
    #[arg(long)]
    pub out: PathBuf,
    /// Tie-breaker seed; overrides `seed_policy.master_seed`.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let definition = ElectionDefinition::load_all(&args.election)?;
    let mut oracle = tie_breaker(args.seed.or(config.seed_policy.master_seed));
    let seed = oracle.seed();

    let summary = tabulate(
        &definition,
        &mut oracle,
        seed,
        config.seed_policy.label.clone(),
    )?;
    write_artefacts(&args.out, &summary, &config.output)?;

    println!("{}", headline(&summary));
    println!("seed: {seed}  outcome hash: {}", summary.outcome_hash);
    Ok(())
}
