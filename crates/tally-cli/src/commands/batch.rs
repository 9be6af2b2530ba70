use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tally_core::derive_substream_seed;
use tracing::info;

use super::{headline, tie_breaker, write_artefacts, write_json};
use crate::config::load_config;
use crate::input::ElectionDefinition;
use crate::summary::tabulate;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Election definitions to tabulate, each with a per-election derived seed.
    #[arg(long = "inputs", value_name = "PATH", num_args = 1..)]
    pub inputs: Vec<PathBuf>,
    /// Optional YAML run configuration shared by the batch.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory; each election gets a subdirectory named after its file.
    #[arg(long)]
    pub out: PathBuf,
    /// Master seed; overrides `seed_policy.master_seed`.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    label: String,
    input: String,
    seed: u64,
    summary: String,
    outcome_hash: String,
}

#[derive(Debug, Serialize)]
struct BatchIndex {
    master_seed: u64,
    runs: Vec<BatchEntry>,
}

fn label_for(path: &Path, index: usize) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("election_{index}"))
}

pub fn run(args: &BatchArgs) -> Result<(), Box<dyn Error>> {
    if args.inputs.is_empty() {
        return Err("batch needs at least one input".into());
    }
    let config = load_config(args.config.as_deref())?;
    let master_seed = tie_breaker(args.seed.or(config.seed_policy.master_seed)).seed();

    let mut runs = Vec::with_capacity(args.inputs.len());
    for (index, input) in args.inputs.iter().enumerate() {
        let mut label = label_for(input, index);
        if runs.iter().any(|entry: &BatchEntry| entry.label == label) {
            label = format!("{label}_{index}");
        }
        let seed = derive_substream_seed(master_seed, index as u64);
        let definition = ElectionDefinition::load(input)?;
        let summary = tabulate(
            &definition,
            &mut tie_breaker(Some(seed)),
            seed,
            Some(label.clone()),
        )?;
        let dir = args.out.join(&label);
        write_artefacts(&dir, &summary, &config.output)?;
        info!(%label, seed, "batch entry done");
        println!("{label}: {}", headline(&summary));
        runs.push(BatchEntry {
            label,
            input: input.display().to_string(),
            seed,
            summary: dir.join("summary.json").display().to_string(),
            outcome_hash: summary.outcome_hash,
        });
    }

    write_json(args.out.join("index.json"), &BatchIndex { master_seed, runs })?;
    Ok(())
}
